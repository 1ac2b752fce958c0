//! Deterministic local content synthesis.
//!
//! Serves as the `mock` provider and as the degradation path when a real provider
//! fails transiently. The only randomness is the cosmetic title adjective, drawn from
//! the caller's RNG so seeded runs are reproducible.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::keywords::{build_tags, extract_title_keywords};
use super::seo::derive_seo;
use super::slug::slugify;
use super::text::{
    capitalize, clip_with_ellipsis, escape_html, keyword_density, normalize_whitespace, word_tokens,
};
use super::types::{CategoryInfo, ContentRequest, GeneratedContent, OptionFlag};

pub const MAX_DESCRIPTION: usize = 400;
pub const MIN_DETAILS_CHARS: usize = 1000;
pub const MIN_SECTION_CHARS: usize = 150;

/// Keyword density band the builder steers the primary keyword into
pub const DENSITY_LOW: f64 = 0.04;
pub const DENSITY_HIGH: f64 = 0.06;

const MAX_ADJUSTMENTS: usize = 240;

pub const ADJECTIVE_POOL: &[&str] = &["Ultimate", "Epic", "Amazing", "Thrilling", "Awesome"];

const TITLE_PREFIXES: &[&str] = &["ai enhanced:", "about"];
const GAME_MARKERS: &[&str] = &["game", "io", "rush", "ball"];

const FALLBACK_PRIMARY: &str = "content";
const FALLBACK_SECONDARY: &str = "experience";

/// Sentences that mention the primary keyword (`{p}`)
const KEYWORD_SENTENCES: &[&str] = &[
    "Every session of {p} rewards focus, and the {s} elements keep {p} feeling fresh.",
    "Newcomers pick up {p} quickly, while regulars keep finding deeper {s} layers in {p}.",
    "The pacing of {p} builds steadily, so each {s} moment lands with real weight.",
    "People return to {p} for its balance of challenge and {s} variety.",
    "Sharing {p} highlights with friends is part of the fun, and {p} makes that easy.",
    "With {p} the first steps stay gentle while the {s} depth keeps growing.",
];

/// Sentences without the primary keyword, used to pull density down
const NEUTRAL_SENTENCES: &[&str] = &[
    "Short sessions fit into a busy day, yet longer sittings reveal more depth.",
    "Clear feedback makes it easy to understand what happened and try again.",
    "The presentation stays clean, so attention goes where it matters most.",
    "Progress feels earned, and small improvements add up over time.",
    "Everything needed to get started is explained up front, without clutter.",
    "Regular visitors will notice thoughtful details that reward a second look.",
];

const GAME_HIGHLIGHTS: &[&str] = &[
    "Responsive {p} controls that feel natural from the first minute",
    "Varied {s} challenges that keep every round of {p} different",
    "A clear sense of progress as your {p} skills improve",
    "Quick restarts, so one more {p} attempt is always close",
    "Plenty of {s} depth for anyone who wants to master {p}",
];

const GENERAL_HIGHLIGHTS: &[&str] = &[
    "A focused introduction to {p} without filler",
    "Practical {s} details you can put to use right away",
    "Clear structure that makes {p} easy to follow",
    "Context that connects {p} with related {s} topics",
    "Pointers for going deeper once the {p} basics are covered",
];

/// (question, answer) pairs
const GAME_FAQ: &[(&str, &str)] = &[
    ("What is {t}?", "{t} is a {n} built around {p} and {s}, playable in short bursts or long sessions."),
    ("How do I get better at {p}?", "Learn the basic {p} controls first, watch how each {s} situation unfolds, and adjust your timing with every run."),
    ("Who will enjoy {t}?", "Anyone who likes quick {s} challenges will feel at home, and fans of {p} will find plenty to master."),
];

const GENERAL_FAQ: &[(&str, &str)] = &[
    ("What is {t}?", "{t} brings together the essentials of {p} and {s} in one place."),
    ("Who is this {p} overview for?", "It suits readers new to {p} as well as those who want a quick refresher on {s}."),
    ("Where should I start?", "Begin with the overview above, then use the highlights to jump to the {p} topics that matter to you."),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentKind {
    Game,
    Video,
    News,
    General,
}

impl ContentKind {
    fn detect(title: &str, category: Option<&CategoryInfo>) -> Self {
        if let Some(category) = category {
            let text = format!("{} {}", category.name, category.category_type).to_lowercase();
            if text.contains("game") {
                return ContentKind::Game;
            }
            if text.contains("video") {
                return ContentKind::Video;
            }
            if text.contains("news") {
                return ContentKind::News;
            }
        }
        if looks_like_game(title) {
            ContentKind::Game
        } else {
            ContentKind::General
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            ContentKind::Game => "game",
            ContentKind::Video => "video",
            ContentKind::News => "story",
            ContentKind::General => "resource",
        }
    }
}

/// Title mentions a game marker word (or anything containing "game")
pub fn looks_like_game(title: &str) -> bool {
    word_tokens(title)
        .iter()
        .any(|word| GAME_MARKERS.contains(&word.as_str()) || word.contains("game"))
}

/// Remove a leading "AI Enhanced:" or "About" label
pub fn strip_title_prefix(title: &str) -> &str {
    let trimmed = title.trim();
    for prefix in TITLE_PREFIXES {
        let matches = trimmed
            .get(..prefix.len())
            .map_or(false, |head| head.eq_ignore_ascii_case(prefix));
        if !matches {
            continue;
        }
        let rest = &trimmed[prefix.len()..];
        // "About" must be a whole word; "Aboutique" stays intact
        if prefix.ends_with(':') || rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return rest.trim_start();
        }
    }
    trimmed
}

/// Strip known prefixes and, for game-like titles, prepend one adjective
pub fn optimize_title<R: Rng + ?Sized>(title: &str, rng: &mut R) -> String {
    let stripped = strip_title_prefix(title);
    let lower = stripped.to_lowercase();
    let has_superlative = ADJECTIVE_POOL
        .iter()
        .chain(["best"].iter())
        .any(|word| lower.split_whitespace().any(|w| w == word.to_lowercase()));

    if looks_like_game(stripped) && !has_superlative {
        if let Some(adjective) = ADJECTIVE_POOL.choose(rng) {
            return format!("{} {}", adjective, stripped);
        }
    }
    stripped.to_string()
}

/// Short description: drop an "About {title}" echo, collapse whitespace, clip to 400
pub fn clip_description(title: &str, description: &str) -> String {
    let mut text = normalize_whitespace(description);
    let echo = normalize_whitespace(&format!("About {}", title.trim()));
    let echo_matches = text
        .get(..echo.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(&echo));
    if !title.trim().is_empty() && echo_matches {
        text = text[echo.len()..].trim_start().to_string();
    }
    clip_with_ellipsis(&text, MAX_DESCRIPTION)
}

pub fn image_alt(title: &str, has_image: bool) -> String {
    if has_image {
        format!("Screenshot of {}", title)
    } else {
        format!("Image showcasing {}", title)
    }
}

#[derive(Debug, Clone)]
enum Block {
    Paragraph(String),
    List(Vec<String>),
    Faq(String, String),
}

impl Block {
    fn visible_len(&self) -> usize {
        match self {
            Block::Paragraph(text) => text.chars().count(),
            Block::List(items) => items.iter().map(|i| i.chars().count()).sum(),
            Block::Faq(q, a) => q.chars().count() + a.chars().count(),
        }
    }
}

#[derive(Debug, Clone)]
struct Section {
    heading: String,
    blocks: Vec<Block>,
}

impl Section {
    fn new(heading: String) -> Self {
        Self {
            heading,
            blocks: Vec::new(),
        }
    }

    fn visible_len(&self) -> usize {
        self.blocks.iter().map(Block::visible_len).sum()
    }

    /// Append to the trailing paragraph, or open a new one
    fn push_sentence(&mut self, sentence: String) {
        if let Some(Block::Paragraph(text)) = self.blocks.last_mut() {
            text.push(' ');
            text.push_str(&sentence);
        } else {
            self.blocks.push(Block::Paragraph(sentence));
        }
    }
}

/// Section-templated long-form HTML with keyword-density steering.
///
/// Keywords come from the plain title (before any adjective is added) so the
/// primary keyword is the first meaningful title word.
#[derive(Debug, Clone)]
pub struct DetailsHtmlBuilder {
    title: String,
    primary: String,
    secondary: String,
    kind: ContentKind,
}

impl DetailsHtmlBuilder {
    pub fn new(display_title: &str, keyword_title: &str, category: Option<&CategoryInfo>) -> Self {
        let keywords = extract_title_keywords(strip_title_prefix(keyword_title));
        let primary = keywords
            .first()
            .cloned()
            .unwrap_or_else(|| FALLBACK_PRIMARY.to_string());
        let secondary = keywords
            .get(1)
            .cloned()
            .unwrap_or_else(|| FALLBACK_SECONDARY.to_string());
        let title = if display_title.trim().is_empty() {
            capitalize(&primary)
        } else {
            display_title.trim().to_string()
        };

        Self {
            title,
            primary,
            secondary,
            kind: ContentKind::detect(keyword_title, category),
        }
    }

    pub fn primary_keyword(&self) -> &str {
        &self.primary
    }

    pub fn secondary_keyword(&self) -> &str {
        &self.secondary
    }

    fn fill(&self, template: &str) -> String {
        template
            .replace("{t}", &escape_html(&self.title))
            .replace("{P}", &capitalize(&self.primary))
            .replace("{p}", &self.primary)
            .replace("{s}", &self.secondary)
            .replace("{n}", self.kind.noun())
    }

    fn keyword_sentence(&self, index: usize) -> String {
        self.fill(KEYWORD_SENTENCES[index % KEYWORD_SENTENCES.len()])
    }

    fn neutral_sentence(&self, index: usize) -> String {
        self.fill(NEUTRAL_SENTENCES[index % NEUTRAL_SENTENCES.len()])
    }

    fn overview(&self, description: &str) -> Section {
        let heading = match self.kind {
            ContentKind::General => format!("About {}", self.title),
            _ => format!("{} Overview", self.title),
        };
        let mut section = Section::new(heading);
        for paragraph in description.split("\n\n") {
            let paragraph = normalize_whitespace(paragraph);
            if !paragraph.is_empty() {
                section.blocks.push(Block::Paragraph(escape_html(&paragraph)));
            }
        }
        section.blocks.push(Block::Paragraph(format!(
            "{} {}",
            self.fill("This {n} puts {p} front and center, with {s} woven through every part."),
            self.keyword_sentence(0)
        )));
        section
    }

    fn elaboration(&self) -> Section {
        let heading = match self.kind {
            ContentKind::Game => self.fill("How {P} Plays"),
            ContentKind::Video => self.fill("Inside the {P} Story"),
            ContentKind::News => self.fill("{P} in Context"),
            ContentKind::General => self.fill("Understanding {P}"),
        };
        let mut section = Section::new(heading);
        section.push_sentence(self.keyword_sentence(1));
        section.push_sentence(self.neutral_sentence(0));
        section.push_sentence(self.keyword_sentence(2));
        section
    }

    fn highlights(&self) -> Section {
        let pool = match self.kind {
            ContentKind::Game => GAME_HIGHLIGHTS,
            _ => GENERAL_HIGHLIGHTS,
        };
        let mut section = Section::new(self.fill("Key {P} Highlights"));
        section
            .blocks
            .push(Block::List(pool.iter().map(|item| self.fill(item)).collect()));
        section
    }

    fn faq(&self) -> Section {
        let pool = match self.kind {
            ContentKind::Game => GAME_FAQ,
            _ => GENERAL_FAQ,
        };
        let mut section = Section::new("Frequently Asked Questions".to_string());
        for (question, answer) in pool {
            section
                .blocks
                .push(Block::Faq(self.fill(question), self.fill(answer)));
        }
        section
    }

    fn render(&self, sections: &[Section]) -> String {
        let mut html = String::from("<article>\n");
        for (index, section) in sections.iter().enumerate() {
            let tag = if index == 0 { "h2" } else { "h3" };
            html.push_str(&format!(
                "<section>\n<{tag}>{}</{tag}>\n",
                escape_html(&section.heading)
            ));
            for block in &section.blocks {
                match block {
                    Block::Paragraph(text) => html.push_str(&format!("<p>{}</p>\n", text)),
                    Block::List(items) => {
                        html.push_str("<ul>\n");
                        for item in items {
                            html.push_str(&format!("<li>{}</li>\n", item));
                        }
                        html.push_str("</ul>\n");
                    }
                    Block::Faq(question, answer) => {
                        html.push_str(&format!("<h4>{}</h4>\n<p>{}</p>\n", question, answer));
                    }
                }
            }
            html.push_str("</section>\n");
        }
        html.push_str("</article>");
        html
    }

    /// Top up short sections, then steer length and density
    fn finish(&self, mut sections: Vec<Section>, steer_density: bool) -> String {
        let mut keyword_turn = 3;
        let mut neutral_turn = 1;

        for section in sections.iter_mut() {
            while section.visible_len() < MIN_SECTION_CHARS {
                let sentence = if neutral_turn <= keyword_turn {
                    neutral_turn += 1;
                    self.neutral_sentence(neutral_turn)
                } else {
                    keyword_turn += 1;
                    self.keyword_sentence(keyword_turn)
                };
                section.push_sentence(sentence);
            }
        }

        // sentences are added to the second section, or the first when there is one
        let target = if sections.len() > 1 { 1 } else { 0 };
        let mut html = self.render(&sections);
        for _ in 0..MAX_ADJUSTMENTS {
            let density = keyword_density(&html, &self.primary);
            let too_short = html.chars().count() < MIN_DETAILS_CHARS;
            let sentence = if steer_density && density < DENSITY_LOW {
                keyword_turn += 1;
                self.keyword_sentence(keyword_turn)
            } else if steer_density && density > DENSITY_HIGH {
                neutral_turn += 1;
                self.neutral_sentence(neutral_turn)
            } else if too_short {
                // alternate to stay inside the band
                if density < (DENSITY_LOW + DENSITY_HIGH) / 2.0 {
                    keyword_turn += 1;
                    self.keyword_sentence(keyword_turn)
                } else {
                    neutral_turn += 1;
                    self.neutral_sentence(neutral_turn)
                }
            } else {
                break;
            };
            sections[target].push_sentence(sentence);
            html = self.render(&sections);
        }

        debug!(
            "Built detailsHtml: {} chars, '{}' density {:.1}%",
            html.chars().count(),
            self.primary,
            keyword_density(&html, &self.primary) * 100.0
        );
        html
    }

    /// Full four-section body: overview, elaboration, highlights, FAQ.
    ///
    /// Density is only steered while the generated sections make up most of the
    /// body; a long description carries itself and is left undiluted.
    pub fn build(&self, description: &str) -> String {
        let steer_density =
            normalize_whitespace(description).chars().count() < MIN_DETAILS_CHARS / 2;
        let sections = vec![
            self.overview(description),
            self.elaboration(),
            self.highlights(),
            self.faq(),
        ];
        self.finish(sections, steer_density)
    }

    /// Body assembled from free-form provider text, one paragraph per line.
    ///
    /// Every third paragraph gets a keyword sentence appended.
    pub fn build_from_text(&self, description: &str, raw_text: &str) -> String {
        let mut analysis = Section::new(self.fill("{P} in Detail"));
        let paragraphs = raw_text
            .lines()
            .map(|line| line.trim_matches(|c: char| c.is_whitespace() || "*#`>-".contains(c)))
            .map(|line| normalize_whitespace(&line.replace(['*', '#', '`'], " ")))
            .filter(|line| line.chars().count() > 10);
        for (index, paragraph) in paragraphs.enumerate() {
            let mut text = escape_html(&paragraph);
            if index % 3 == 0 {
                text.push(' ');
                text.push_str(&self.fill(
                    "This part of {p} adds to the overall {s} picture.",
                ));
            }
            analysis.blocks.push(Block::Paragraph(text));
        }

        let mut sections = vec![self.overview(description)];
        if !analysis.blocks.is_empty() {
            sections.push(analysis);
        }
        sections.push(self.highlights());
        self.finish(sections, false)
    }

    /// Append a keyword-reinforced section until `html` reaches the minimum length
    pub fn extend(&self, html: &str) -> String {
        if html.chars().count() >= MIN_DETAILS_CHARS {
            return html.to_string();
        }

        let mut extended = html.trim_end().to_string();
        let mut section = format!(
            "\n<section>\n<h3>{}</h3>\n<p>",
            escape_html(&self.fill("More About {P}"))
        );
        let mut turn = 0;
        while extended.chars().count() + section.chars().count() + "</p>\n</section>".len()
            < MIN_DETAILS_CHARS
        {
            let sentence = if turn % 2 == 0 {
                self.keyword_sentence(turn / 2)
            } else {
                self.neutral_sentence(turn / 2)
            };
            if turn > 0 {
                section.push(' ');
            }
            section.push_str(&sentence);
            turn += 1;
        }
        section.push_str("</p>\n</section>");
        extended.push_str(&section);
        extended
    }

    /// Minimal body from title and description, padded to the minimum length
    pub fn skeleton(&self, description: &str) -> String {
        let html = format!(
            "<article>\n<h2>{}</h2>\n<p>{}</p>\n</article>",
            escape_html(&self.title),
            escape_html(&normalize_whitespace(description))
        );
        self.extend(&html)
    }
}

/// The `mock` provider
#[derive(Debug, Clone, Copy, Default)]
pub struct MockContentSynthesizer;

impl MockContentSynthesizer {
    pub fn new() -> Self {
        Self
    }

    pub fn synthesize<R: Rng + ?Sized>(&self, request: &ContentRequest, rng: &mut R) -> GeneratedContent {
        debug!("🎭 Synthesizing mock content for '{}'", request.title);

        let category = request.category_info.as_ref();
        let title = optimize_title(&request.title, rng);
        let title = if title.is_empty() {
            "Untitled".to_string()
        } else {
            title
        };
        let description = clip_description(&request.title, &request.description);
        let tags = build_tags(strip_title_prefix(&request.title), &request.description, category);

        let mut content = GeneratedContent {
            image_alt: Some(image_alt(&title, request.image_url.is_some())),
            title,
            description,
            tags,
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
            content.details_html = Some(builder.build(&request.description));
        }

        if request.wants(OptionFlag::AutoStructure) {
            content.address_bar = Some(slugify(strip_title_prefix(&request.title)));
        }

        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::types::GenerationOptions;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const CURVE_DESCRIPTION: &str = "About Curve Rush IO\n\nThe addictive Curve Rush IO experience is back with a twist: now you can guide your ball through endless hills in thrilling multiplayer mode.";

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_strip_title_prefix() {
        assert_eq!(strip_title_prefix("AI Enhanced: Curve Rush"), "Curve Rush");
        assert_eq!(strip_title_prefix("about Escape Road"), "Escape Road");
        assert_eq!(strip_title_prefix("Aboutique Finder"), "Aboutique Finder");
    }

    #[test]
    fn test_optimize_title_adds_adjective_to_games() {
        let title = optimize_title("Curve Rush IO", &mut rng());
        assert!(title.ends_with("Curve Rush IO"));
        let adjective = title.trim_end_matches("Curve Rush IO").trim();
        assert!(ADJECTIVE_POOL.contains(&adjective));

        assert_eq!(optimize_title("Epic Ball Quest", &mut rng()), "Epic Ball Quest");
        assert_eq!(optimize_title("Gardening Tips", &mut rng()), "Gardening Tips");
    }

    #[test]
    fn test_optimize_title_is_seed_deterministic() {
        let a = optimize_title("Ball Battle Arena", &mut StdRng::seed_from_u64(99));
        let b = optimize_title("Ball Battle Arena", &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_clip_description() {
        assert_eq!(
            clip_description("Curve Rush IO", CURVE_DESCRIPTION),
            "The addictive Curve Rush IO experience is back with a twist: now you can guide your ball through endless hills in thrilling multiplayer mode."
        );

        let long = "Fact. ".repeat(200);
        let clipped = clip_description("X", &long);
        assert!(clipped.chars().count() <= MAX_DESCRIPTION);
    }

    #[test]
    fn test_details_html_meets_length_and_density() {
        let builder = DetailsHtmlBuilder::new("Ultimate Curve Rush IO", "Curve Rush IO", None);
        assert_eq!(builder.primary_keyword(), "curve");
        assert_eq!(builder.secondary_keyword(), "rush");

        let html = builder.build(CURVE_DESCRIPTION);
        assert!(html.chars().count() >= MIN_DETAILS_CHARS);
        let density = keyword_density(&html, "curve");
        assert!((0.03..=0.07).contains(&density), "density was {density}");
        assert!(!html.contains("style="));
        assert!(html.contains("<ul>") && html.contains("<h4>"));
    }

    #[test]
    fn test_details_html_preserves_long_description() {
        let description = "Modes: classic, time attack, zen. Controls: arrow keys or tap. 12 worlds with 40 levels each. ".repeat(8);
        let builder = DetailsHtmlBuilder::new("Hill Climber", "Hill Climber", None);
        let html = builder.build(&description);

        assert!(html.contains("Modes: classic, time attack, zen."));
        assert!(html.contains("12 worlds with 40 levels each."));
        assert!(html.chars().count() >= MIN_DETAILS_CHARS);
    }

    #[test]
    fn test_long_description_gets_no_repeated_filler() {
        let description: String = (0..150)
            .map(|stage| format!("Stage {} adds new hills and gems to collect. ", stage))
            .collect();
        let builder = DetailsHtmlBuilder::new("Curve Rush IO", "Curve Rush IO", None);
        let html = builder.build(&description);

        assert!(html.contains("Stage 149 adds new hills"));
        for index in 0..KEYWORD_SENTENCES.len() {
            let sentence = builder.keyword_sentence(index);
            assert!(html.matches(&sentence).count() <= 1, "repeated: {sentence}");
        }
        for index in 0..NEUTRAL_SENTENCES.len() {
            let sentence = builder.neutral_sentence(index);
            assert!(html.matches(&sentence).count() <= 1, "repeated: {sentence}");
        }
        assert!(html.chars().count() < description.len() + 4000);
    }

    #[test]
    fn test_details_html_escapes_user_text() {
        let builder = DetailsHtmlBuilder::new("<b>Title</b>", "Title", None);
        let html = builder.build("5 < 6 & <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_build_from_text_and_extend() {
        let builder = DetailsHtmlBuilder::new("Escape Road", "Escape Road", None);
        let html = builder.build_from_text("Drive fast.", "## Intro\nEscape the police on busy roads.\nshort\n* Dodge traffic while collecting cash.\nThe **Escape Road** cars use `arrow` keys and #1 ranked physics.");
        assert!(html.contains("Escape the police on busy roads."));
        assert!(html.contains("The Escape Road cars use arrow keys and 1 ranked physics."));
        assert!(!html.contains("**") && !html.contains('`') && !html.contains("#1"));
        assert!(!html.contains("short</p>"));
        assert!(html.chars().count() >= MIN_DETAILS_CHARS);

        let extended = builder.extend("<div><p>tiny</p></div>");
        assert!(extended.starts_with("<div><p>tiny</p></div>"));
        assert!(extended.chars().count() >= MIN_DETAILS_CHARS);

        let skeleton = builder.skeleton("");
        assert!(skeleton.contains("<h2>Escape Road</h2>"));
        assert!(skeleton.chars().count() >= MIN_DETAILS_CHARS);
    }

    #[test]
    fn test_synthesize_respects_option_flags() {
        let synthesizer = MockContentSynthesizer::new();
        let request = ContentRequest::new("Curve Rush IO", CURVE_DESCRIPTION);

        let bare = synthesizer.synthesize(&request, &mut rng());
        assert!(bare.seo_title.is_none());
        assert!(bare.details_html.is_none());
        assert!(bare.address_bar.is_none());
        assert!(bare.tags.len() >= 3 && bare.tags.len() <= 5);
        assert_eq!(bare.image_alt.as_deref(), Some(format!("Image showcasing {}", bare.title).as_str()));

        let full = synthesizer.synthesize(
            &request.clone().with_options(GenerationOptions::all()),
            &mut rng(),
        );
        assert_eq!(full.address_bar.as_deref(), Some("curve-rush-io"));
        assert!(full.seo_title.as_deref().unwrap().contains("Curve Rush IO"));
        assert!(full.seo_description.as_deref().unwrap().chars().count() <= 160);
        assert!(full.details_html.as_deref().unwrap().chars().count() >= MIN_DETAILS_CHARS);
        assert!(full.description.chars().count() <= MAX_DESCRIPTION);
    }

    #[test]
    fn test_synthesize_degenerate_title() {
        let request = ContentRequest::new("", "").with_options(GenerationOptions::all());
        let content = MockContentSynthesizer::new().synthesize(&request, &mut rng());

        assert_eq!(content.title, "Untitled");
        assert_eq!(content.address_bar.as_deref(), Some(crate::generation::slug::DEFAULT_SLUG));
        assert!(content.details_html.unwrap().chars().count() >= MIN_DETAILS_CHARS);
        assert!(content.tags.len() >= 3);
    }
}
