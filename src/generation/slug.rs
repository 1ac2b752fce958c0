//! URL slug derivation for the `addressBar` field

/// Returned when a title has no usable ASCII characters
pub const DEFAULT_SLUG: &str = "untitled";

pub const MAX_SLUG_LEN: usize = 50;

/// Turn a title into a lowercase, hyphen-separated, URL-safe token.
///
/// Never returns an empty string: degenerate input (empty, non-Latin, punctuation
/// only) yields [`DEFAULT_SLUG`].
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        if c.is_whitespace() || c == '-' {
            // collapse runs as we go
            if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        }
    }

    let slug: String = slug.trim_matches('-').chars().take(MAX_SLUG_LEN).collect();
    let slug = slug.trim_end_matches('-');

    if slug.is_empty() {
        DEFAULT_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// True when `slug` already satisfies the slug invariants
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_titles() {
        assert_eq!(slugify("Escape Road"), "escape-road");
        assert_eq!(slugify("Curve Rush IO"), "curve-rush-io");
        assert_eq!(slugify("  Ball -- Battle!! Arena 2 "), "ball-battle-arena-2");
    }

    #[test]
    fn test_degenerate_titles_fall_back() {
        assert_eq!(slugify(""), DEFAULT_SLUG);
        assert_eq!(slugify("   "), DEFAULT_SLUG);
        assert_eq!(slugify("弹球大战"), DEFAULT_SLUG);
        assert_eq!(slugify("!!! ??? ---"), DEFAULT_SLUG);
    }

    #[test]
    fn test_punctuation_inside_words_is_dropped() {
        assert_eq!(slugify("Don't Stop: Café Edition"), "dont-stop-caf-edition");
        assert_eq!(slugify("snake_case_title"), "snakecasetitle");
    }

    #[test]
    fn test_length_cap() {
        let title = "word ".repeat(30);
        let slug = slugify(&title);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(is_valid_slug(&slug));
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_every_output_is_valid() {
        for title in ["Escape Road", "", "ÄÖÜ über", "a--b", "-lead trail-", "Mixed 中文 Title"] {
            assert!(is_valid_slug(&slugify(title)), "bad slug for {:?}", title);
        }
    }
}
