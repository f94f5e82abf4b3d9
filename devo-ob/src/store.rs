//! Record Store Gateway
//!
//! The onboarding engine only ever needs two things from persistence: the
//! current canonical population and a way to insert an approved candidate.

use async_trait::async_trait;
use devo_common::{db, Devotee, NewDevotee, Result};
use sqlx::SqlitePool;

/// Persistent store of canonical devotee records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All canonical records, `id` populated
    async fn fetch_all(&self) -> Result<Vec<Devotee>>;

    /// Persist a new record and return it with its assigned `id`
    async fn insert(&self, devotee: &NewDevotee) -> Result<Devotee>;
}

/// [`RecordStore`] backed by the `devotees` table
#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn fetch_all(&self) -> Result<Vec<Devotee>> {
        db::fetch_all_devotees(&self.pool).await
    }

    async fn insert(&self, devotee: &NewDevotee) -> Result<Devotee> {
        db::insert_devotee(&self.pool, devotee).await
    }
}
