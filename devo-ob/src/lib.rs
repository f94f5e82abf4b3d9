//! devo-ob - Devotee onboarding with duplicate detection
//!
//! Pasted or manually entered devotee records are scored against the stored
//! population before insertion. Candidates scoring above the duplicate
//! threshold are flagged for a reviewer, who may still approve them.

pub mod normalize;
pub mod parser;
pub mod score;
pub mod session;
pub mod store;

pub use parser::parse_bulk;
pub use score::{score, score_breakdown, FieldMatches, DUPLICATE_THRESHOLD_POINTS};
pub use session::{classify, ApprovedCandidate, OnboardingSession, ScoredCandidate, SessionSnapshot};
pub use store::{RecordStore, SqliteRecordStore};
