//! Small text helpers shared by the generators

/// Collapse every whitespace run (including newlines) into a single space
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clip `text` to at most `max_chars` characters, appending "..." when cut.
///
/// Cuts on a word boundary when one exists in the back half of the window.
pub fn clip_with_ellipsis(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let budget = max_chars.saturating_sub(3);
    let window: String = text.chars().take(budget).collect();
    let cut = match window.rfind(' ') {
        Some(pos) if window[..pos].chars().count() >= budget / 2 => &window[..pos],
        _ => window.as_str(),
    };
    let cut = cut.trim_end_matches(|c: char| c.is_whitespace() || ",;:-".contains(c));

    format!("{}...", cut)
}

/// Upper-case the first character
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Replace every tag with a space, leaving visible text
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

/// Lowercased word tokens; anything other than letters, digits and `_` separates words
pub fn word_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fraction of visible words in `html` equal to `keyword`
pub fn keyword_density(html: &str, keyword: &str) -> f64 {
    let words = word_tokens(&strip_tags(html));
    if words.is_empty() {
        return 0.0;
    }
    let keyword = keyword.to_lowercase();
    let hits = words.iter().filter(|word| **word == keyword).count();
    hits as f64 / words.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_short_text_untouched() {
        assert_eq!(clip_with_ellipsis("  short text ", 20), "short text");
    }

    #[test]
    fn test_clip_on_word_boundary() {
        let clipped = clip_with_ellipsis("one two three four five six seven", 20);
        assert_eq!(clipped, "one two three...");
        assert!(clipped.chars().count() <= 20);
    }

    #[test]
    fn test_clip_counts_chars_not_bytes() {
        let text = "é".repeat(50);
        let clipped = clip_with_ellipsis(&text, 10);
        assert_eq!(clipped.chars().count(), 10);
    }

    #[test]
    fn test_strip_tags_and_density() {
        let html = "<h2>Curve Rush</h2><p>curve curve, fun!</p>";
        assert_eq!(normalize_whitespace(&strip_tags(html)), "Curve Rush curve curve, fun!");
        assert!((keyword_density(html, "curve") - 0.6).abs() < 1e-9);
        assert_eq!(keyword_density("", "curve"), 0.0);
    }

    #[test]
    fn test_escape_and_capitalize() {
        assert_eq!(escape_html("<a & b>"), "&lt;a &amp; b&gt;");
        assert_eq!(capitalize("curve"), "Curve");
        assert_eq!(capitalize(""), "");
    }
}
