//! Field canonicalization applied before any comparison

/// Lower-case an email address. Absent input normalizes to `""`.
pub fn normalize_email(email: Option<&str>) -> String {
    email.map(str::to_lowercase).unwrap_or_default()
}

/// Keep only ASCII decimal digits. Absent input normalizes to `""`.
pub fn normalize_phone(phone: Option<&str>) -> String {
    phone
        .map(|p| p.chars().filter(char::is_ascii_digit).collect())
        .unwrap_or_default()
}

/// Lower-case a name. Whitespace is left untouched.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_lowercased_not_trimmed() {
        assert_eq!(normalize_email(Some("ALICE@X.COM")), "alice@x.com");
        assert_eq!(normalize_email(Some(" Bob@X.com")), " bob@x.com");
        assert_eq!(normalize_email(None), "");
    }

    #[test]
    fn test_phone_digits_only() {
        assert_eq!(normalize_phone(Some("(555) 123-4567")), "5551234567");
        assert_eq!(normalize_phone(Some("+1 555.123.4567 ext")), "15551234567");
        assert_eq!(normalize_phone(Some("---")), "");
        assert_eq!(normalize_phone(None), "");
    }

    #[test]
    fn test_name_case_only() {
        assert_eq!(normalize_name("Alice SMITH"), "alice smith");
        assert_eq!(normalize_name("Alice  Smith"), "alice  smith");
        assert_ne!(normalize_name("Alice Smith"), normalize_name("Alice  Smith"));
    }
}
