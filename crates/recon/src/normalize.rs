/// Canonical join key: surrounding whitespace stripped, lowercased.
///
/// Idempotent, so keys that have already been normalized can be passed back in.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}
