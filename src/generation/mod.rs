//! Content generation pipeline.
//!
//! One call to [`ContentGenerator::generate_content`] routes to the configured
//! provider, builds the prompt, parses the reply and, on a transient failure,
//! degrades to local synthesis with a warning attached.

pub mod errors;
pub mod keywords;
pub mod mock;
pub mod parser;
pub mod prompt;
pub mod seo;
pub mod slug;
pub mod text;
pub mod types;

pub use errors::{
    ClassifiedError, ErrorClass, ErrorClassifier, GenerationError, MessageHeuristicClassifier,
};
pub use mock::{DetailsHtmlBuilder, MockContentSynthesizer};
pub use parser::ResponseParser;
pub use prompt::PromptBuilder;
pub use types::{
    CategoryInfo, ContentRequest, GeneratedContent, GenerationOptions, GenerationOutcome,
    GenerationWarning, OptionFlag,
};

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::llm::{create_llm, ChatMessage, LLMProvider, LLM};
use mock::{clip_description, strip_title_prefix, MIN_DETAILS_CHARS};
use seo::derive_seo;
use slug::slugify;

enum Backend {
    Mock,
    Model(Arc<dyn LLM>),
}

/// The generation service. Holds only construction-time state, so one instance
/// can serve concurrent calls.
pub struct ContentGenerator {
    backend: Backend,
    classifier: Box<dyn ErrorClassifier>,
    seed: Option<u64>,
    prompts: PromptBuilder,
    parser: ResponseParser,
    synthesizer: MockContentSynthesizer,
}

impl ContentGenerator {
    fn with_backend(backend: Backend) -> Self {
        Self {
            backend,
            classifier: Box::new(MessageHeuristicClassifier::new()),
            seed: None,
            prompts: PromptBuilder::new(),
            parser: ResponseParser::new(),
            synthesizer: MockContentSynthesizer::new(),
        }
    }

    /// Local synthesis only, no network
    pub fn mock() -> Self {
        Self::with_backend(Backend::Mock)
    }

    pub fn with_llm(llm: Arc<dyn LLM>) -> Self {
        Self::with_backend(Backend::Model(llm))
    }

    /// Build from configuration; a real provider that cannot be constructed
    /// (usually a missing key) falls back to the mock backend.
    pub fn from_config(config: &Config) -> Self {
        let generator = match config.ai.provider {
            LLMProvider::Mock => {
                info!("🎭 AI provider: mock (local synthesis)");
                Self::mock()
            }
            provider => match create_llm(&config.ai) {
                Ok(llm) => {
                    info!("🤖 AI provider: {} (model {})", provider, config.ai.model());
                    Self::with_llm(Arc::from(llm))
                }
                Err(e) => {
                    warn!("⚠️ {} initialisation failed ({}), falling back to mock provider", provider, e);
                    Self::mock()
                }
            },
        };

        match config.generation.seed {
            Some(seed) => generator.with_seed(seed),
            None => generator,
        }
    }

    /// Fix the style/angle/adjective draws
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_classifier(mut self, classifier: Box<dyn ErrorClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn provider(&self) -> LLMProvider {
        match &self.backend {
            Backend::Mock => LLMProvider::Mock,
            Backend::Model(llm) => llm.provider_type(),
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// The prompt a provider-backed call would send
    pub fn build_prompt(&self, request: &ContentRequest) -> String {
        self.prompts.build(request, &mut self.rng())
    }

    pub async fn generate_content(
        &self,
        request: &ContentRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        let started = Instant::now();
        let mut rng = self.rng();

        let (content, warning, provider) = match &self.backend {
            Backend::Mock => (
                self.synthesizer.synthesize(request, &mut rng),
                None,
                LLMProvider::Mock,
            ),
            Backend::Model(llm) => {
                let prompt = self.prompts.build(request, &mut rng);
                debug!("📝 Prompt for '{}': {} chars", request.title, prompt.len());

                match llm.chat(vec![ChatMessage::user(prompt)]).await {
                    Ok(response) => {
                        debug!(
                            "📥 Provider response: {} chars, {} tokens",
                            response.content.len(),
                            response
                                .tokens_used
                                .map_or_else(|| "unknown".to_string(), |tokens| tokens.to_string())
                        );
                        (
                            self.parser.parse(&response.content, request),
                            None,
                            llm.provider_type(),
                        )
                    }
                    Err(e) => {
                        let classified = self.classifier.classify(&e);
                        if classified.is_fatal() {
                            error!("❌ {}: {}", classified.class.code(), classified.message);
                            return Err(classified.into_error());
                        }
                        warn!(
                            "⚠️ {} from {}, returning fallback content: {}",
                            classified.class.code(),
                            llm.provider_type(),
                            classified.message
                        );
                        (
                            self.synthesizer.synthesize(request, &mut rng),
                            Some(classified.to_warning()),
                            LLMProvider::Mock,
                        )
                    }
                }
            }
        };

        let content = self.ensure_complete(content, request);
        info!(
            "✅ Generated content for '{}' via {} in {:?}{}",
            request.title,
            provider,
            started.elapsed(),
            if warning.is_some() { " (degraded)" } else { "" }
        );

        Ok(GenerationOutcome {
            content,
            warning,
            provider,
        })
    }

    /// Every flagged group is present and every unflagged one absent
    fn ensure_complete(&self, mut content: GeneratedContent, request: &ContentRequest) -> GeneratedContent {
        let category = request.category_info.as_ref();

        if content.title.trim().is_empty() {
            content.title = strip_title_prefix(&request.title).to_string();
        }
        if content.title.trim().is_empty() {
            content.title = "Untitled".to_string();
        }
        content.description = clip_description(&request.title, &content.description);

        if request.wants(OptionFlag::AutoSeo) {
            let derived = derive_seo(&content.title, &content.description, &content.tags, category);
            content.seo_title.get_or_insert(derived.seo_title);
            content.seo_description.get_or_insert(derived.seo_description);
            content.seo_keywords.get_or_insert(derived.seo_keywords);
        } else {
            content.seo_title = None;
            content.seo_description = None;
            content.seo_keywords = None;
        }

        if request.wants(OptionFlag::AutoContent) {
            let builder = DetailsHtmlBuilder::new(&content.title, &request.title, category);
            let html = match content.details_html.take() {
                Some(html) if !html.trim().is_empty() => builder.extend(&html),
                _ => {
                    warn!("⚠️ detailsHtml missing after generation, synthesizing skeleton");
                    builder.skeleton(&request.description)
                }
            };
            debug_assert!(html.chars().count() >= MIN_DETAILS_CHARS);
            content.details_html = Some(html);
        } else {
            content.details_html = None;
        }

        if request.wants(OptionFlag::AutoStructure) {
            let slug = content
                .address_bar
                .as_deref()
                .map(slugify)
                .unwrap_or_else(|| slugify(strip_title_prefix(&request.title)));
            content.address_bar = Some(slug);
        } else {
            content.address_bar = None;
        }

        content
    }
}

impl Default for ContentGenerator {
    fn default() -> Self {
        Self::mock()
    }
}
