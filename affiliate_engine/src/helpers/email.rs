use regex::Regex;

/// Deliberately loose: one `@`, no whitespace, and a dot somewhere in the domain. Anything stricter belongs to a
/// verification email, not a regex.
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

pub fn is_valid_email(email: &str) -> bool {
    Regex::new(EMAIL_PATTERN).map(|re| re.is_match(email)).unwrap_or(false)
}

/// Email addresses are stored trimmed and lower-cased so that uniqueness is case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
