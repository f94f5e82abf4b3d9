//! Weighted multi-field similarity between two devotee records
//!
//! Each field contributes a fixed weight when both sides carry a non-empty
//! value and the normalized values are equal:
//!
//! | field | weight |
//! |-------|--------|
//! | email | 0.5    |
//! | name  | 0.3    |
//! | phone | 0.2    |
//!
//! Weights are summed in hundredths so threshold comparisons are exact.

use devo_common::Devotee;
use serde::Serialize;

use crate::normalize::{normalize_email, normalize_name, normalize_phone};

pub const EMAIL_POINTS: u32 = 50;
pub const NAME_POINTS: u32 = 30;
pub const PHONE_POINTS: u32 = 20;

/// Scores strictly above this are possible duplicates
pub const DUPLICATE_THRESHOLD_POINTS: u32 = 60;

/// Which fields matched between two records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldMatches {
    pub email: bool,
    pub name: bool,
    pub phone: bool,
}

impl FieldMatches {
    /// Score in hundredths
    pub fn points(&self) -> u32 {
        let mut points = 0;
        if self.email {
            points += EMAIL_POINTS;
        }
        if self.name {
            points += NAME_POINTS;
        }
        if self.phone {
            points += PHONE_POINTS;
        }
        points
    }

    pub fn score(&self) -> f64 {
        points_to_score(self.points())
    }
}

/// Field-level comparison of `a` and `b`
pub fn score_breakdown(a: &Devotee, b: &Devotee) -> FieldMatches {
    let email = !a.email().is_empty()
        && !b.email().is_empty()
        && normalize_email(a.email.as_deref()) == normalize_email(b.email.as_deref());

    let name = !a.name.is_empty()
        && !b.name.is_empty()
        && normalize_name(&a.name) == normalize_name(&b.name);

    // Non-emptiness is checked on the raw value, so two punctuation-only
    // phones still compare equal after normalization
    let phone = !a.phone().is_empty()
        && !b.phone().is_empty()
        && normalize_phone(a.phone.as_deref()) == normalize_phone(b.phone.as_deref());

    FieldMatches { email, name, phone }
}

/// Similarity score in `[0, 1]`
pub fn score(a: &Devotee, b: &Devotee) -> f64 {
    score_breakdown(a, b).score()
}

/// Duplicate decision on a score in hundredths (strict greater-than)
pub fn is_duplicate_points(points: u32) -> bool {
    points > DUPLICATE_THRESHOLD_POINTS
}

pub fn points_to_score(points: u32) -> f64 {
    f64::from(points) / 100.0
}
