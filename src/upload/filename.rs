//! Destination filenames for stored parts.
//!
//! A stored name is `{unix_seconds}-{declared}`. Two parts with the same
//! declared name inside the same second map to the same file and the later
//! one wins. The declared name is only reduced to its last path component;
//! anything else the client sends is kept as is.

/// Build the stored filename from the current wall-clock second
pub fn generate(declared: &str) -> String {
    stored_filename(declared, chrono::Utc::now().timestamp())
}

/// Build the stored filename for a given timestamp
pub fn stored_filename(declared: &str, unix_seconds: i64) -> String {
    format!("{}-{}", unix_seconds, base_name(declared))
}

/// Last `/`-separated component, ignoring trailing slashes
fn base_name(declared: &str) -> &str {
    declared
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("")
}
