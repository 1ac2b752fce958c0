//! Request and result types for content generation

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::llm::LLMProvider;

/// One output group the caller asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionFlag {
    /// seoTitle / seoDescription / seoKeywords
    AutoSeo,
    /// detailsHtml
    AutoContent,
    /// addressBar
    AutoStructure,
}

impl OptionFlag {
    pub const ALL: [OptionFlag; 3] = [
        OptionFlag::AutoSeo,
        OptionFlag::AutoContent,
        OptionFlag::AutoStructure,
    ];

    /// Wire name used by the CMS frontend
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionFlag::AutoSeo => "autoSEO",
            OptionFlag::AutoContent => "autoContent",
            OptionFlag::AutoStructure => "autoStructure",
        }
    }

    /// Parse a wire name; unrecognised names (e.g. `autoTags`) yield `None`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "autoseo" | "seo" => Some(OptionFlag::AutoSeo),
            "autocontent" | "content" => Some(OptionFlag::AutoContent),
            "autostructure" | "structure" => Some(OptionFlag::AutoStructure),
            _ => None,
        }
    }
}

/// Normalised set of option flags.
///
/// Accepts a JSON array of names, an object of `{name: bool}`, or a comma-separated
/// string, and always serializes back as an array of names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOptions(BTreeSet<OptionFlag>);

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every flag set
    pub fn all() -> Self {
        OptionFlag::ALL.into_iter().collect()
    }

    /// Parse a comma-separated list such as `autoSEO,autoContent`
    pub fn parse_list(list: &str) -> Self {
        list.split(',').filter_map(OptionFlag::from_name).collect()
    }

    pub fn with(mut self, flag: OptionFlag) -> Self {
        self.0.insert(flag);
        self
    }

    pub fn contains(&self, flag: OptionFlag) -> bool {
        self.0.contains(&flag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = OptionFlag> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<OptionFlag> for GenerationOptions {
    fn from_iter<I: IntoIterator<Item = OptionFlag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOptions {
    List(Vec<String>),
    Map(BTreeMap<String, bool>),
    Csv(String),
}

impl<'de> Deserialize<'de> for GenerationOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let options = match Option::<RawOptions>::deserialize(deserializer)? {
            Some(RawOptions::List(names)) => names
                .iter()
                .filter_map(|name| OptionFlag::from_name(name))
                .collect(),
            Some(RawOptions::Map(flags)) => flags
                .iter()
                .filter(|(_, enabled)| **enabled)
                .filter_map(|(name, _)| OptionFlag::from_name(name))
                .collect(),
            Some(RawOptions::Csv(list)) => Self::parse_list(&list),
            None => Self::default(),
        };
        Ok(options)
    }
}

impl Serialize for GenerationOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(OptionFlag::as_str))
    }
}

/// Advisory category context; shapes tone, never overrides facts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub name: String,
    #[serde(rename = "type", default)]
    pub category_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CategoryInfo {
    pub fn new(name: impl Into<String>, category_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category_type: category_type.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Input for a single generation call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iframe_url: Option<String>,
    #[serde(default)]
    pub options: GenerationOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_info: Option<CategoryInfo>,
}

impl ContentRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_category(mut self, category: CategoryInfo) -> Self {
        self.category_info = Some(category);
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_iframe_url(mut self, url: impl Into<String>) -> Self {
        self.iframe_url = Some(url.into());
        self
    }

    pub fn wants(&self, flag: OptionFlag) -> bool {
        self.options.contains(flag)
    }
}

/// Generated content record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_bar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details_html: Option<String>,
}

/// Side-channel note attached to a degraded but successful result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationWarning {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Successful result of `generate_content`
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub content: GeneratedContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<GenerationWarning>,
    pub provider: LLMProvider,
}

impl GenerationOutcome {
    pub fn is_degraded(&self) -> bool {
        self.warning.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_array() {
        let request: ContentRequest = serde_json::from_str(
            r#"{"title": "Escape Road", "options": ["autoTags", "autoSEO", "autoContent"]}"#,
        )
        .unwrap();

        assert!(request.wants(OptionFlag::AutoSeo));
        assert!(request.wants(OptionFlag::AutoContent));
        assert!(!request.wants(OptionFlag::AutoStructure));
        assert_eq!(request.description, "");
    }

    #[test]
    fn test_options_from_object() {
        let options: GenerationOptions = serde_json::from_str(
            r#"{"autoSEO": true, "autoContent": false, "autoStructure": true}"#,
        )
        .unwrap();

        assert!(options.contains(OptionFlag::AutoSeo));
        assert!(!options.contains(OptionFlag::AutoContent));
        assert!(options.contains(OptionFlag::AutoStructure));
    }

    #[test]
    fn test_options_null_and_csv() {
        let request: ContentRequest =
            serde_json::from_str(r#"{"title": "x", "options": null}"#).unwrap();
        assert!(request.options.is_empty());

        let options = GenerationOptions::parse_list("autoSEO, autoStructure,bogus");
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!(["autoSEO", "autoStructure"])
        );
    }

    #[test]
    fn test_generated_content_wire_names() {
        let content = GeneratedContent {
            title: "T".to_string(),
            description: "D".to_string(),
            address_bar: Some("t".to_string()),
            ..GeneratedContent::default()
        };
        let value = serde_json::to_value(&content).unwrap();

        assert_eq!(value["addressBar"], "t");
        assert!(value.get("detailsHtml").is_none());
    }

    #[test]
    fn test_category_type_field() {
        let category: CategoryInfo =
            serde_json::from_str(r#"{"name": "Arcade", "type": "game"}"#).unwrap();
        assert_eq!(category.category_type, "game");
        assert!(category.description.is_none());
    }
}
