//! HTML text helpers

/// Escape text for use in element content and quoted attribute values
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Drop tags, keeping text content
pub fn strip_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match (in_tag, c) {
            (false, '<') => in_tag = true,
            (true, '>') => in_tag = false,
            (false, _) => out.push(c),
            (true, _) => {}
        }
    }
    out
}

/// Shorten to at most `length` characters, cutting at a word boundary
/// when one exists, and append `omission` (default `...`)
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    if s.chars().count() <= length {
        return s.to_string();
    }

    let omission = omission.unwrap_or("...");
    let keep = length.saturating_sub(omission.chars().count());
    let head: String = s.chars().take(keep).collect();

    // Only back off to a space if the cut landed mid-word
    let next_is_space = s.chars().nth(keep).is_some_and(char::is_whitespace);
    let head = match head.rfind(char::is_whitespace) {
        Some(pos) if !next_is_space && pos > 0 => &head[..pos],
        _ => head.as_str(),
    };

    format!("{}{}", head.trim_end(), omission)
}
