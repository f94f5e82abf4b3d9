//! Database models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person under consideration for onboarding.
///
/// `id` is only present for records already persisted in the `devotees`
/// table (canonical records). A record without an `id` is a candidate.
/// Empty strings and `None` are treated the same everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Devotee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Devotee {
    /// Create an unpersisted candidate. Empty optional fields become `None`.
    pub fn candidate(name: impl Into<String>, email: Option<&str>, phone: Option<&str>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: non_empty(email),
            phone: non_empty(phone),
        }
    }

    pub fn is_canonical(&self) -> bool {
        self.id.is_some()
    }

    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }

    pub fn phone(&self) -> &str {
        self.phone.as_deref().unwrap_or("")
    }

    /// Insert payload: name/email/phone only
    pub fn to_new(&self) -> NewDevotee {
        NewDevotee {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Fields written to the store on approval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDevotee {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_drops_empty_fields() {
        let d = Devotee::candidate("Bob", Some(""), None);
        assert_eq!(d.email, None);
        assert_eq!(d.phone, None);
        assert_eq!(d.email(), "");
        assert!(!d.is_canonical());
    }

    #[test]
    fn test_to_new_carries_contact_fields() {
        let d = Devotee::candidate("Alice", Some("alice@x.com"), Some("555-123-4567"));
        let new = d.to_new();
        assert_eq!(new.name, "Alice");
        assert_eq!(new.email.as_deref(), Some("alice@x.com"));
        assert_eq!(new.phone.as_deref(), Some("555-123-4567"));
    }
}
