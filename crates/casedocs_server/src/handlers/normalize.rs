//! Normalization helpers for optional string request fields.

/// Empty or whitespace-only values are treated as absent.
pub(super) fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
