//! Bulk paste parser
//!
//! Input format, one devotee per line:
//!
//! ```text
//! name,email,phone
//! ```
//!
//! No quoting or escaping. Fields past the third are ignored, missing
//! trailing fields are absent, and lines without a name are skipped.

use devo_common::Devotee;

const FIELD_COUNT: usize = 3;

/// Parse pasted text into candidates, in input order
pub fn parse_bulk(raw: &str) -> Vec<Devotee> {
    raw.split('\n').filter_map(parse_line).collect()
}

/// Parse one line; `None` when the name field is empty
pub fn parse_line(line: &str) -> Option<Devotee> {
    let mut fields = line.splitn(FIELD_COUNT + 1, ',').map(str::trim);

    let name = fields.next().unwrap_or("");
    if name.is_empty() {
        return None;
    }

    let email = fields.next();
    let phone = fields.next();

    Some(Devotee::candidate(name, email, phone))
}
