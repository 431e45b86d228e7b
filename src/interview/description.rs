// src/interview/description.rs

pub const MAX_DESCRIPTION_CHARS: usize = 2800;
pub const ELLIPSIS: &str = "...";

/// Caps a job description at `max_chars` characters (not bytes), trimming
/// trailing whitespace at the cut and appending [`ELLIPSIS`].
pub fn truncate_description(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}{}", text[..cut].trim_end(), ELLIPSIS),
    }
}
