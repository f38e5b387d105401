//! Display-text helpers for list rows.
//!
//! Result rows show a repository description and its URL in a narrow column,
//! so long values are trimmed to a prefix plus a `".."` marker.  The trim is
//! measured in characters, not bytes, so multi-byte text never splits mid
//! character.

/// Longest value (in chars) that is still displayed whole.
pub const TRUNCATE_LIMIT: usize = 40;

/// How many chars of a too-long value survive, before the marker.
///
/// Independent of [`TRUNCATE_LIMIT`]: values between the two lengths are
/// displayed whole, anything past the limit is cut down to this prefix.
pub const TRUNCATE_KEEP: usize = 29;

/// Marker appended to a trimmed value.
const MARKER: &str = "..";

/// Shown in place of a value the API did not provide.
const PLACEHOLDER: &str = "-";

/// Trim `text` for single-row display.
///
/// A missing value renders as `"-"`.  A value of at most `limit` chars is
/// returned unchanged; anything longer is cut to its first `keep` chars
/// followed by `".."`.
pub fn truncate(text: Option<&str>, limit: usize, keep: usize) -> String {
    match text {
        None => PLACEHOLDER.to_string(),
        Some(t) if t.chars().count() <= limit => t.to_string(),
        Some(t) => {
            let prefix: String = t.chars().take(keep).collect();
            format!("{prefix}{MARKER}")
        }
    }
}

/// [`truncate`] with the standard row limits, for optional fields.
pub fn truncate_display(text: Option<&str>) -> String {
    truncate(text, TRUNCATE_LIMIT, TRUNCATE_KEEP)
}

/// [`truncate`] with the standard row limits, for fields that are always set.
pub fn truncate_required(text: &str) -> String {
    truncate(Some(text), TRUNCATE_LIMIT, TRUNCATE_KEEP)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
