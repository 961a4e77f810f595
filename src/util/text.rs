// src/util/text.rs

/// Extract the first non-empty line of plain text, trimmed.
///
/// # Examples
///
/// ```
/// use notedeck::util::text::first_line;
///
/// assert_eq!(first_line("\n  Buy milk \nand eggs"), "Buy milk");
/// ```
pub fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

/// Shorten `text` to at most `max_chars` characters, marking the cut with `…`.
///
/// Counts characters, not bytes, so multi-byte text is never split mid-character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}
