//! String helpers for log-friendly previews.

/// Collapse a (possibly multi-line) reply into a single-line preview of at
/// most `max_chars` characters, appending `...` when shortened.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat: String = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let kept: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
