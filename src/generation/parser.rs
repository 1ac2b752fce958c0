//! Provider output normalization.
//!
//! `ResponseParser::parse` never fails: well-formed JSON is backfilled field by
//! field, anything else is turned into a degraded record built from the request and
//! the raw text.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::{debug, warn};

use super::keywords::{build_tags, normalize_tags, MIN_TAGS};
use super::mock::{clip_description, image_alt, strip_title_prefix, DetailsHtmlBuilder};
use super::seo::{derive_seo, MAX_SEO_DESCRIPTION};
use super::slug::slugify;
use super::text::{clip_with_ellipsis, normalize_whitespace};
use super::types::{ContentRequest, GeneratedContent, OptionFlag};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrList {
    List(Vec<String>),
    Text(String),
}

impl StringOrList {
    fn into_items(self) -> Vec<String> {
        match self {
            StringOrList::List(items) => items,
            StringOrList::Text(text) => text.split(',').map(|item| item.trim().to_string()).collect(),
        }
    }
}

/// Provider JSON as received; every field may be missing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawContent {
    title: Option<String>,
    description: Option<String>,
    tags: Option<StringOrList>,
    image_alt: Option<String>,
    seo_title: Option<String>,
    seo_description: Option<String>,
    seo_keywords: Option<StringOrList>,
    address_bar: Option<String>,
    details_html: Option<String>,
}

fn fence_regex() -> Option<&'static Regex> {
    static FENCE: OnceLock<Option<Regex>> = OnceLock::new();
    FENCE
        .get_or_init(|| Regex::new(r"(?s)```[A-Za-z]*\s*(.*?)```").ok())
        .as_ref()
}

fn style_regex() -> Option<&'static Regex> {
    static STYLE: OnceLock<Option<Regex>> = OnceLock::new();
    STYLE
        .get_or_init(|| Regex::new(r#"(?i)\s+style\s*=\s*(?:"[^"]*"|'[^']*')"#).ok())
        .as_ref()
}

/// Pull the JSON candidate out of fenced or prose-wrapped output
fn extract_json(raw: &str) -> String {
    let mut candidate = raw.trim();

    if let Some(inner) = fence_regex()
        .and_then(|re| re.captures(candidate))
        .and_then(|caps| caps.get(1))
    {
        candidate = inner.as_str().trim();
    }

    if !candidate.starts_with('{') {
        if let (Some(start), Some(end)) = (candidate.find('{'), candidate.rfind('}')) {
            if end > start {
                candidate = &candidate[start..=end];
            }
        }
    }

    candidate.to_string()
}

/// Literal `\n` escapes become line breaks; inline styles are dropped
fn clean_details_html(html: &str) -> String {
    let html = html.replace("\\n", "\n");
    match style_regex() {
        Some(re) => re.replace_all(&html, "").trim().to_string(),
        None => html.trim().to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, raw: &str, request: &ContentRequest) -> GeneratedContent {
        let candidate = extract_json(raw);
        match serde_json::from_str::<RawContent>(&candidate) {
            Ok(parsed) => {
                debug!("Parsed provider JSON ({} chars)", candidate.len());
                self.normalize(parsed, request)
            }
            Err(e) => {
                warn!("⚠️ Provider returned malformed JSON ({}), building degraded content", e);
                self.degraded(raw, request)
            }
        }
    }

    fn fallback_title(request: &ContentRequest) -> String {
        let title = strip_title_prefix(&request.title);
        if title.is_empty() {
            "Untitled".to_string()
        } else {
            title.to_string()
        }
    }

    fn normalize(&self, raw: RawContent, request: &ContentRequest) -> GeneratedContent {
        let category = request.category_info.as_ref();
        let plain_title = strip_title_prefix(&request.title);

        let title = non_empty(raw.title).unwrap_or_else(|| Self::fallback_title(request));
        let description = clip_description(
            &request.title,
            &non_empty(raw.description).unwrap_or_else(|| request.description.clone()),
        );

        let mut tags = normalize_tags(&raw.tags.map(StringOrList::into_items).unwrap_or_default());
        if tags.len() < MIN_TAGS {
            for tag in build_tags(plain_title, &request.description, category) {
                if tags.len() >= MIN_TAGS {
                    break;
                }
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
        }

        let image_alt = non_empty(raw.image_alt)
            .unwrap_or_else(|| image_alt(&title, request.image_url.is_some()));

        let mut content = GeneratedContent {
            title,
            description,
            tags,
            image_alt: Some(image_alt),
            ..GeneratedContent::default()
        };

        if request.wants(OptionFlag::AutoSeo) {
            let derived = derive_seo(&content.title, &content.description, &content.tags, category);
            content.seo_title = Some(non_empty(raw.seo_title).unwrap_or(derived.seo_title));
            content.seo_description = Some(
                non_empty(raw.seo_description)
                    .map(|text| clip_with_ellipsis(&normalize_whitespace(&text), MAX_SEO_DESCRIPTION))
                    .unwrap_or(derived.seo_description),
            );
            let keywords = raw
                .seo_keywords
                .map(|k| {
                    k.into_items()
                        .into_iter()
                        .filter(|item| !item.trim().is_empty())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .filter(|joined| !joined.is_empty());
            content.seo_keywords = Some(keywords.unwrap_or(derived.seo_keywords));
        }

        if request.wants(OptionFlag::AutoContent) {
            let builder = DetailsHtmlBuilder::new(&content.title, &request.title, category);
            let html = non_empty(raw.details_html)
                .map(|html| clean_details_html(&html))
                .filter(|html| !html.is_empty());
            content.details_html = Some(match html {
                Some(html) => builder.extend(&html),
                None => builder.build(&request.description),
            });
        }

        if request.wants(OptionFlag::AutoStructure) {
            let source = non_empty(raw.address_bar).unwrap_or_else(|| plain_title.to_string());
            content.address_bar = Some(slugify(&source));
        }

        content
    }

    /// Record built from the request plus free-form provider text
    fn degraded(&self, raw: &str, request: &ContentRequest) -> GeneratedContent {
        let category = request.category_info.as_ref();
        let plain_title = strip_title_prefix(&request.title);
        let title = Self::fallback_title(request);
        let cleaned = raw.replace(['*', '#', '`'], " ");

        let mut content = GeneratedContent {
            image_alt: Some(image_alt(&title, request.image_url.is_some())),
            description: clip_description(&request.title, &request.description),
            tags: build_tags(
                plain_title,
                &format!("{} {}", request.description, cleaned),
                category,
            ),
            title,
            ..GeneratedContent::default()
        };

        if request.wants(OptionFlag::AutoSeo) {
            let seo = derive_seo(&content.title, &content.description, &content.tags, category);
            content.seo_title = Some(seo.seo_title);
            content.seo_description = Some(seo.seo_description);
            content.seo_keywords = Some(seo.seo_keywords);
        }

        if request.wants(OptionFlag::AutoContent) {
            let builder = DetailsHtmlBuilder::new(&content.title, &request.title, category);
            content.details_html = Some(builder.build_from_text(&request.description, raw));
        }

        if request.wants(OptionFlag::AutoStructure) {
            content.address_bar = Some(slugify(plain_title));
        }

        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::mock::{MAX_DESCRIPTION, MIN_DETAILS_CHARS};
    use crate::generation::types::GenerationOptions;

    fn request() -> ContentRequest {
        ContentRequest::new("Curve Rush IO", "Guide your ball through endless hills in multiplayer mode.")
            .with_options(GenerationOptions::all())
    }

    #[test]
    fn test_extract_json_variants() {
        assert_eq!(extract_json("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(extract_json("```{\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(
            extract_json("Sure! Here it is:\n{\"a\": {\"b\": 2}}\nHope this helps."),
            "{\"a\": {\"b\": 2}}"
        );
        assert_eq!(extract_json("no json here"), "no json here");
    }

    #[test]
    fn test_clean_details_html() {
        let html = r#"<h2 style="color: red">Title</h2>\n<p style='background: linear-gradient(#fff, #000)'>Body</p>"#;
        assert_eq!(clean_details_html(html), "<h2>Title</h2>\n<p>Body</p>");
    }

    #[test]
    fn test_fenced_json_is_normalized() {
        let raw = "```json\n{\n  \"title\": \"Curve Rush IO: Endless Hills\",\n  \"description\": \"Ride the hills.\",\n  \"tags\": [\"Curve\", \"#hills\", \"curve\"],\n  \"seoDescription\": \"".to_string()
            + &"Long meta description text ".repeat(12)
            + "\",\n  \"addressBar\": \"Curve Rush IO!!\",\n  \"detailsHtml\": \"<h2 style=\\\"color:red\\\">Curve Rush</h2>\\\\n<p>Short.</p>\"\n}\n```";

        let content = ResponseParser::new().parse(&raw, &request());

        assert_eq!(content.title, "Curve Rush IO: Endless Hills");
        assert_eq!(content.description, "Ride the hills.");
        assert_eq!(&content.tags[..2], ["curve", "hills"]);
        assert!(content.tags.len() >= MIN_TAGS);
        assert!(content.seo_description.as_deref().unwrap().chars().count() <= MAX_SEO_DESCRIPTION);
        assert_eq!(content.address_bar.as_deref(), Some("curve-rush-io"));

        let html = content.details_html.unwrap();
        assert!(html.starts_with("<h2>Curve Rush</h2>\n<p>Short.</p>"));
        assert!(!html.contains("style="));
        assert!(html.chars().count() >= MIN_DETAILS_CHARS);
    }

    #[test]
    fn test_missing_fields_are_backfilled() {
        let content = ResponseParser::new().parse(r#"{"title": "Curve Rush IO"}"#, &request());

        assert_eq!(content.description, "Guide your ball through endless hills in multiplayer mode.");
        assert!(content.tags.len() >= MIN_TAGS);
        assert_eq!(content.seo_title.as_deref(), Some("Curve Rush IO - Complete Guide & Resources"));
        assert!(content.seo_keywords.as_deref().unwrap().starts_with("curve, rush"));
        assert_eq!(content.image_alt.as_deref(), Some("Image showcasing Curve Rush IO"));
        assert!(content.details_html.unwrap().chars().count() >= MIN_DETAILS_CHARS);
        assert_eq!(content.address_bar.as_deref(), Some("curve-rush-io"));
    }

    #[test]
    fn test_unrequested_groups_are_dropped() {
        let request = ContentRequest::new("Escape Road", "Drive fast.");
        let raw = r#"{"title": "Escape Road", "tags": "cars, police, roads", "seoTitle": "x", "addressBar": "escape-road", "detailsHtml": "<p>x</p>"}"#;
        let content = ResponseParser::new().parse(raw, &request);

        assert_eq!(content.tags, vec!["cars", "police", "roads"]);
        assert!(content.seo_title.is_none());
        assert!(content.address_bar.is_none());
        assert!(content.details_html.is_none());
    }

    #[test]
    fn test_malformed_output_degrades() {
        let raw = "## Curve Rush IO\n**Curve Rush IO** is a hill racing game with smooth physics.\nok\n- Collect coins across the endless curve tracks.\nThe **Curve Rush IO** game uses `mouse` controls and #1 ranked physics.";
        let content = ResponseParser::new().parse(raw, &request());

        assert_eq!(content.title, "Curve Rush IO");
        assert!(content.description.chars().count() <= MAX_DESCRIPTION);
        assert!(content.tags.len() >= MIN_TAGS && content.tags.len() <= 5);
        assert!(content.seo_title.is_some());
        let html = content.details_html.unwrap();
        assert!(html.contains("is a hill racing game with smooth physics."));
        assert!(html.contains("The Curve Rush IO game uses mouse controls and 1 ranked physics."));
        assert!(!html.contains("**") && !html.contains('`') && !html.contains("#1"));
        assert!(html.chars().count() >= MIN_DETAILS_CHARS);
        assert_eq!(content.address_bar.as_deref(), Some("curve-rush-io"));
    }

    #[test]
    fn test_parse_never_fails() {
        let parser = ResponseParser::new();
        for raw in ["", "   ", "[1, 2, 3]", "{\"title\": 42}", "{ broken", "```\n```", "null"] {
            let content = parser.parse(raw, &request());
            assert!(!content.title.is_empty(), "empty title for {:?}", raw);
            assert!(content.details_html.is_some());
            assert!(content.address_bar.is_some());
        }
    }
}
