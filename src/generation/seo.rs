//! SEO field derivation.
//!
//! Pure and deterministic: identical inputs always give byte-identical output. Used
//! to backfill provider responses and to fill the mock path.

use serde::{Deserialize, Serialize};

use super::keywords::{extract_title_keywords, MAX_TAGS};
use super::text::{clip_with_ellipsis, normalize_whitespace};
use super::types::CategoryInfo;

pub const MAX_SEO_DESCRIPTION: usize = 160;

/// Below this length the description is topped up with a closing sentence
const MIN_SEO_DESCRIPTION: usize = 140;

const GENERIC_SUFFIX: &str = "Complete Guide & Resources";

/// Category keyword -> seoTitle suffix, first match wins
const SUFFIX_TABLE: &[(&str, &str)] = &[
    ("game", "Play Free Online"),
    ("video", "Watch Online Content"),
    ("news", "Latest News & Updates"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoFields {
    pub seo_title: String,
    pub seo_description: String,
    pub seo_keywords: String,
}

/// Suffix for the category, matched on its name first, then its type
pub fn seo_title_suffix(category: Option<&CategoryInfo>) -> &'static str {
    let Some(category) = category else {
        return GENERIC_SUFFIX;
    };

    [&category.name, &category.category_type]
        .iter()
        .map(|field| field.to_lowercase())
        .find_map(|field| {
            SUFFIX_TABLE
                .iter()
                .find(|(keyword, _)| field.contains(keyword))
                .map(|(_, suffix)| *suffix)
        })
        .unwrap_or(GENERIC_SUFFIX)
}

pub fn seo_title(title: &str, category: Option<&CategoryInfo>) -> String {
    format!("{} - {}", title.trim(), seo_title_suffix(category))
}

/// Description clipped to 160 chars; short ones get a closing sentence first
pub fn seo_description(title: &str, description: &str, category: Option<&CategoryInfo>) -> String {
    let mut text = normalize_whitespace(description);
    let suffix = seo_title_suffix(category);

    if text.is_empty() {
        text = format!("Discover {}: {}.", title.trim(), suffix);
    } else if text.chars().count() < MIN_SEO_DESCRIPTION {
        if !text.ends_with(['.', '!', '?']) {
            text.push('.');
        }
        text = format!("{} Explore {} - {}.", text, title.trim(), suffix);
    }

    clip_with_ellipsis(&text, MAX_SEO_DESCRIPTION)
}

/// Title keywords then tags, deduplicated, at most five, comma-joined
pub fn seo_keywords(title: &str, tags: &[String]) -> String {
    let mut keywords: Vec<String> = Vec::new();
    let candidates = extract_title_keywords(title)
        .into_iter()
        .chain(tags.iter().map(|t| t.trim().to_lowercase()));

    for keyword in candidates {
        if keywords.len() == MAX_TAGS {
            break;
        }
        if !keyword.is_empty() && !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }

    keywords.join(", ")
}

pub fn derive_seo(
    title: &str,
    description: &str,
    tags: &[String],
    category: Option<&CategoryInfo>,
) -> SeoFields {
    SeoFields {
        seo_title: seo_title(title, category),
        seo_description: seo_description(title, description, category),
        seo_keywords: seo_keywords(title, tags),
    }
}
