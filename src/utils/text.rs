//! Text preview helpers

pub const ELLIPSIS: &str = "...";

/// Cut `text` to at most `max_chars` characters, appending "..." only when
/// something was actually removed. Counts chars, never splits a code point.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}
