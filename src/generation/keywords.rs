//! Keyword extraction for tags, SEO keywords and density targets

use std::collections::HashMap;

use super::text::word_tokens;
use super::types::CategoryInfo;

/// Words never used as keywords
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "can", "this", "that", "these", "those", "i",
    "you", "he", "she", "it", "we", "they", "your", "our", "their", "its", "from", "into",
    "about", "now", "not", "all", "more", "most", "just", "also", "very", "than", "then",
    "them", "there", "what", "which", "who", "when", "where", "how", "out", "get", "any",
    "each", "only", "over", "some", "such", "own", "new", "one", "via", "while", "through",
];

pub const MAX_TAGS: usize = 5;
pub const MIN_TAGS: usize = 3;

/// Title keywords used as density targets
pub const MAX_TITLE_KEYWORDS: usize = 3;

/// Used only when title, body and category yield fewer than [`MIN_TAGS`] tags
const FALLBACK_TAGS: &[&str] = &["online", "guide", "free", "content", "review"];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

fn candidate_tokens(text: &str) -> impl Iterator<Item = String> {
    word_tokens(text)
        .into_iter()
        .filter(|word| word.chars().count() > 2 && !is_stop_word(word))
}

/// Title-derived keywords, in title order, deduplicated, at most three.
///
/// The first entry is the primary keyword for density targets.
pub fn extract_title_keywords(title: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for word in candidate_tokens(title) {
        if !keywords.contains(&word) {
            keywords.push(word);
        }
        if keywords.len() == MAX_TITLE_KEYWORDS {
            break;
        }
    }
    keywords
}

/// Body-derived keywords ranked by frequency (ties keep first appearance)
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, word) in candidate_tokens(text).enumerate() {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(word, _, _)| word)
        .collect()
}

/// Build the 3–5 tag list for a record.
///
/// Ranked keywords from `text` come first; title keywords, category tokens and a
/// fixed pool pad short results.
pub fn build_tags(title: &str, text: &str, category: Option<&CategoryInfo>) -> Vec<String> {
    let mut tags = extract_keywords(&format!("{} {}", title, text), MAX_TAGS);

    let category_words: Vec<String> = category
        .map(|c| candidate_tokens(&format!("{} {}", c.name, c.category_type)).collect())
        .unwrap_or_default();

    let padding = extract_title_keywords(title)
        .into_iter()
        .chain(category_words)
        .chain(FALLBACK_TAGS.iter().map(|t| t.to_string()));

    for word in padding {
        if tags.len() >= MIN_TAGS {
            break;
        }
        if !tags.contains(&word) {
            tags.push(word);
        }
    }

    tags
}

/// Lowercase, trim and deduplicate provider tags, capped at [`MAX_TAGS`]
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().trim_start_matches('#').to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
        if normalized.len() == MAX_TAGS {
            break;
        }
    }
    normalized
}
