//! HTML escaping for user-supplied text.

/// Escapes `&`, `<`, `>`, `"` and `'` so `text` can be placed in markup.
///
/// Each input character is replaced at most once, so existing entities such
/// as `&amp;` become `&amp;amp;` rather than being left alone.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}
