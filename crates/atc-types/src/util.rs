use chrono::{DateTime, Utc};

/// Serde default for hub-stamped timestamps. The hub overwrites the value on
/// ingress regardless, so this only matters for bodies that omit the field.
pub fn default_now() -> DateTime<Utc> {
    Utc::now()
}

/// Truncate a string to at most `max` characters on a char boundary.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
