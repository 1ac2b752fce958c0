//! Prompt synthesis for the external provider.
//!
//! Pure string construction: the only non-input is the style/angle draw, which
//! varies phrasing between calls without changing the required output shape.

use rand::seq::SliceRandom;
use rand::Rng;

use super::keywords::{extract_keywords, extract_title_keywords};
use super::mock::{MAX_DESCRIPTION, MIN_DETAILS_CHARS};
use super::seo::MAX_SEO_DESCRIPTION;
use super::slug::MAX_SLUG_LEN;
use super::types::{ContentRequest, OptionFlag};

pub const STYLE_POOL: &[&str] = &[
    "conversational and energetic",
    "clear and informative",
    "enthusiastic but precise",
    "friendly and practical",
    "polished and editorial",
];

pub const ANGLE_POOL: &[&str] = &[
    "what makes it stand out for first-time visitors",
    "the core experience and how it feels moment to moment",
    "practical tips that help readers get started",
    "the details a returning fan would appreciate",
    "how it compares with similar titles in its category",
];

/// Openings the provider is told to avoid
const TEMPLATED_OPENINGS: &[&str] = &[
    "Welcome to",
    "Are you ready",
    "In today's world",
    "Look no further",
];

const TARGET_DENSITY_PERCENT: u32 = 5;

/// The per-call style/angle draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptFlavor {
    pub style: &'static str,
    pub angle: &'static str,
}

impl PromptFlavor {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            style: STYLE_POOL.choose(rng).copied().unwrap_or(STYLE_POOL[0]),
            angle: ANGLE_POOL.choose(rng).copied().unwrap_or(ANGLE_POOL[0]),
        }
    }
}

impl Default for PromptFlavor {
    fn default() -> Self {
        Self {
            style: STYLE_POOL[0],
            angle: ANGLE_POOL[0],
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build<R: Rng + ?Sized>(&self, request: &ContentRequest, rng: &mut R) -> String {
        self.build_with(request, PromptFlavor::draw(rng))
    }

    pub fn build_with(&self, request: &ContentRequest, flavor: PromptFlavor) -> String {
        [
            self.role_section(request, flavor),
            self.input_section(request),
            self.guidelines_section(request),
            self.output_section(request),
        ]
        .join("\n\n")
    }

    fn role_section(&self, request: &ContentRequest, flavor: PromptFlavor) -> String {
        let audience = match &request.category_info {
            Some(category) if !category.name.trim().is_empty() => {
                format!("readers browsing the \"{}\" section of a content site", category.name.trim())
            }
            _ => "an international audience".to_string(),
        };

        format!(
            "You are a professional English content writer and SEO editor creating a complete \
             content record for {}.\n\
             Write in a {} voice. Creative angle for this piece: {}.",
            audience, flavor.style, flavor.angle
        )
    }

    fn input_section(&self, request: &ContentRequest) -> String {
        let mut keywords = extract_title_keywords(&request.title);
        for keyword in extract_keywords(&request.description, 5) {
            if !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }

        let mut section = String::from("INPUT\n");
        section.push_str(&format!("- Title: {}\n", request.title.trim()));
        section.push_str(&format!(
            "- Description (source material; preserve all concrete facts: modes, controls, counts, \
             enumerated lists. Re-expression is allowed, omission is not):\n\"\"\"\n{}\n\"\"\"\n",
            request.description.trim()
        ));
        if !keywords.is_empty() {
            section.push_str(&format!("- Target keywords: {}\n", keywords.join(", ")));
        }
        if let Some(category) = &request.category_info {
            section.push_str(&format!("- Category: {}", category.name.trim()));
            if !category.category_type.trim().is_empty() {
                section.push_str(&format!(" (type: {})", category.category_type.trim()));
            }
            section.push('\n');
            if let Some(description) = category.description.as_deref().filter(|d| !d.trim().is_empty()) {
                section.push_str(&format!("- Category description: {}\n", description.trim()));
            }
            section.push_str(
                "- Category context shapes tone and structure only; it never overrides facts from the description.\n",
            );
        }
        if let Some(url) = &request.image_url {
            section.push_str(&format!("- Image: {}\n", url));
        }
        if let Some(url) = &request.iframe_url {
            section.push_str(&format!("- Embedded page: {}\n", url));
        }

        section.trim_end().to_string()
    }

    fn guidelines_section(&self, request: &ContentRequest) -> String {
        let primary = extract_title_keywords(&request.title)
            .into_iter()
            .next()
            .unwrap_or_else(|| request.title.trim().to_lowercase());

        let mut lines = vec![
            "CONTENT GUIDELINES".to_string(),
            "1. Information completeness comes first: every fact in the description must appear in the output before any creative rewriting.".to_string(),
            "2. Optimize the title so it stays recognizable and contains the main keyword.".to_string(),
            format!(
                "3. Do not open with templated phrases such as {}.",
                TEMPLATED_OPENINGS
                    .iter()
                    .map(|opening| format!("\"{}\"", opening))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ];

        if request.wants(OptionFlag::AutoContent) {
            lines.push(format!(
                "4. In detailsHtml, the keyword \"{}\" should make up about {}% of all words, spread naturally across headings, paragraphs and lists without stuffing.",
                primary, TARGET_DENSITY_PERCENT
            ));
            lines.push(
                "5. Choose section headings that fit the category and the material; a fixed About/Features/FAQ skeleton is not required.".to_string(),
            );
            lines.push(
                "6. Use semantic tags only (h2, h3, p, ul, ol, li, strong, em). No inline styles, gradients or background colors.".to_string(),
            );
        }
        if request.wants(OptionFlag::AutoSeo) {
            lines.push(format!(
                "{}. SEO fields must contain \"{}\" and read naturally.",
                lines.len(),
                primary
            ));
        }

        lines.join("\n")
    }

    fn output_section(&self, request: &ContentRequest) -> String {
        let mut fields: Vec<(&str, String, &str)> = vec![
            ("title", "optimized English title".to_string(), "Your optimized title here"),
            (
                "description",
                format!("plain-text summary, at most {} characters", MAX_DESCRIPTION),
                "A short summary of the content here",
            ),
            (
                "tags",
                "array of 3-5 lowercase keyword strings".to_string(),
                "[\"keyword-one\", \"keyword-two\", \"keyword-three\"]",
            ),
            (
                "imageAlt",
                "descriptive image alt text containing the main keyword".to_string(),
                "Description of the image here",
            ),
        ];

        if request.wants(OptionFlag::AutoSeo) {
            fields.push(("seoTitle", "SEO title, at most 60 characters".to_string(), "SEO title here"));
            fields.push((
                "seoDescription",
                format!("meta description, 140-{} characters", MAX_SEO_DESCRIPTION),
                "Meta description here",
            ));
            fields.push((
                "seoKeywords",
                "comma-separated list of up to 5 keywords".to_string(),
                "keyword one, keyword two, keyword three",
            ));
        }
        if request.wants(OptionFlag::AutoContent) {
            fields.push((
                "detailsHtml",
                format!("long-form HTML body, at least {} characters", MIN_DETAILS_CHARS),
                "<h2>Section heading here</h2><p>Paragraph text here</p>",
            ));
        }
        if request.wants(OptionFlag::AutoStructure) {
            fields.push((
                "addressBar",
                format!("lowercase hyphen-separated URL slug, at most {} characters", MAX_SLUG_LEN),
                "your-url-slug-here",
            ));
        }

        let mut section = String::from(
            "OUTPUT FORMAT\nReturn ONLY one JSON object: no code fences, no commentary. Fields:\n",
        );
        for (name, constraint, _) in &fields {
            section.push_str(&format!("- \"{}\": {}\n", name, constraint));
        }
        section.push_str("Omit any field not listed above.\n\nExample:\n{\n");

        let example = fields
            .iter()
            .map(|(name, _, placeholder)| {
                if placeholder.starts_with('[') {
                    format!("  \"{}\": {}", name, placeholder)
                } else {
                    format!("  \"{}\": \"{}\"", name, placeholder)
                }
            })
            .collect::<Vec<_>>()
            .join(",\n");
        section.push_str(&example);
        section.push_str("\n}");
        section
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::types::{CategoryInfo, GenerationOptions};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn request() -> ContentRequest {
        ContentRequest::new(
            "Curve Rush IO",
            "Guide your ball through endless hills. Modes: solo, multiplayer. Controls: mouse or tap.",
        )
    }

    #[test]
    fn test_prompt_echoes_input_and_preservation_rule() {
        let prompt = PromptBuilder::new().build_with(&request(), PromptFlavor::default());

        assert!(prompt.contains("- Title: Curve Rush IO"));
        assert!(prompt.contains("Modes: solo, multiplayer. Controls: mouse or tap."));
        assert!(prompt.contains("omission is not"));
        assert!(prompt.contains("Target keywords: curve, rush"));
        assert!(prompt.contains(STYLE_POOL[0]));
    }

    #[test]
    fn test_output_fields_follow_options() {
        let builder = PromptBuilder::new();

        let bare = builder.build_with(&request(), PromptFlavor::default());
        assert!(bare.contains("\"title\""));
        assert!(!bare.contains("\"detailsHtml\""));
        assert!(!bare.contains("\"seoTitle\""));
        assert!(!bare.contains("about 5%"));

        let full = builder.build_with(
            &request().with_options(GenerationOptions::all()),
            PromptFlavor::default(),
        );
        for field in ["seoTitle", "seoDescription", "seoKeywords", "detailsHtml", "addressBar"] {
            assert!(full.contains(&format!("\"{}\"", field)), "missing {field}");
        }
        assert!(full.contains("\"curve\" should make up about 5%"));
        assert!(full.contains("at least 1000 characters"));
    }

    #[test]
    fn test_category_context_is_advisory() {
        let prompt = PromptBuilder::new().build_with(
            &request().with_category(CategoryInfo::new("Arcade", "game").with_description("Quick browser games")),
            PromptFlavor::default(),
        );

        assert!(prompt.contains("\"Arcade\" section"));
        assert!(prompt.contains("- Category: Arcade (type: game)"));
        assert!(prompt.contains("Category description: Quick browser games"));
        assert!(prompt.contains("never overrides facts"));
    }

    #[test]
    fn test_flavor_draw_only_changes_voice() {
        let request = request().with_options(GenerationOptions::all());
        let builder = PromptBuilder::new();
        let a = builder.build(&request, &mut StdRng::seed_from_u64(1));
        let b = builder.build(&request, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);

        let flavor = PromptFlavor::draw(&mut StdRng::seed_from_u64(2));
        assert!(STYLE_POOL.contains(&flavor.style));
        assert!(ANGLE_POOL.contains(&flavor.angle));

        let tail = |p: &str| p.split_once("INPUT").map(|(_, rest)| rest.to_string());
        let other = builder.build_with(&request, PromptFlavor { style: STYLE_POOL[4], angle: ANGLE_POOL[3] });
        assert_eq!(tail(&a), tail(&other));
    }
}
