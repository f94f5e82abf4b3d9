//! Devotee database operations

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::db::models::{Devotee, NewDevotee};
use crate::{Error, Result};

/// Load every canonical devotee in insertion order
pub async fn fetch_all_devotees(pool: &SqlitePool) -> Result<Vec<Devotee>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, email, phone
        FROM devotees
        ORDER BY created_at, rowid
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let id_str: String = row.get("id");
            let id = Uuid::parse_str(&id_str)
                .map_err(|e| Error::Internal(format!("Invalid devotee id '{}': {}", id_str, e)))?;

            Ok(Devotee {
                id: Some(id),
                name: row.get("name"),
                email: row.get("email"),
                phone: row.get("phone"),
            })
        })
        .collect()
}

/// Insert a devotee and return the stored record with its new id
pub async fn insert_devotee(pool: &SqlitePool, devotee: &NewDevotee) -> Result<Devotee> {
    if devotee.name.trim().is_empty() {
        return Err(Error::InvalidInput("devotee name must not be empty".to_string()));
    }

    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO devotees (id, name, email, phone, created_at)
        VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(id.to_string())
    .bind(&devotee.name)
    .bind(&devotee.email)
    .bind(&devotee.phone)
    .execute(pool)
    .await?;

    Ok(Devotee {
        id: Some(id),
        name: devotee.name.clone(),
        email: devotee.email.clone(),
        phone: devotee.phone.clone(),
    })
}

/// Number of canonical devotees
pub async fn count_devotees(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM devotees")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::create_devotees_table;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        // One connection: every connection to sqlite::memory: is a separate database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        create_devotees_table(&pool)
            .await
            .expect("Schema initialization failed");

        pool
    }

    #[tokio::test]
    async fn test_insert_and_fetch_devotee() {
        let pool = memory_pool().await;

        let new = NewDevotee {
            name: "Alice".to_string(),
            email: Some("alice@x.com".to_string()),
            phone: None,
        };

        let stored = insert_devotee(&pool, &new).await.expect("Failed to insert devotee");
        assert!(stored.id.is_some());

        let all = fetch_all_devotees(&pool).await.expect("Failed to fetch devotees");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], stored);
        assert_eq!(all[0].phone, None);
    }

    #[tokio::test]
    async fn test_fetch_preserves_insertion_order() {
        let pool = memory_pool().await;

        for name in ["Charlie", "Alice", "Bob"] {
            let new = NewDevotee {
                name: name.to_string(),
                email: None,
                phone: None,
            };
            insert_devotee(&pool, &new).await.unwrap();
        }

        let names: Vec<String> = fetch_all_devotees(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();

        assert_eq!(names, vec!["Charlie", "Alice", "Bob"]);
        assert_eq!(count_devotees(&pool).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_name() {
        let pool = memory_pool().await;

        let new = NewDevotee {
            name: "  ".to_string(),
            email: None,
            phone: None,
        };
        let result = insert_devotee(&pool, &new).await;

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(count_devotees(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_contact_fields_allowed() {
        let pool = memory_pool().await;

        let new = NewDevotee {
            name: "Alice".to_string(),
            email: Some("alice@x.com".to_string()),
            phone: Some("5551234567".to_string()),
        };

        insert_devotee(&pool, &new).await.unwrap();
        insert_devotee(&pool, &new).await.unwrap();

        assert_eq!(count_devotees(&pool).await.unwrap(), 2);
    }
}
