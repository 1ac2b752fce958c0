use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter, Registry};

use cms_content_ai::generation::{CategoryInfo, ContentGenerator, ContentRequest, GenerationOptions};
use cms_content_ai::{Config, LLMProvider};

fn request_args() -> Vec<Arg> {
    vec![
        Arg::new("title")
            .short('t')
            .long("title")
            .value_name("TITLE")
            .help("Content title")
            .required(true),
        Arg::new("description")
            .short('d')
            .long("description")
            .value_name("TEXT")
            .help("Source description; facts in it are preserved")
            .default_value(""),
        Arg::new("options")
            .short('o')
            .long("options")
            .value_name("LIST")
            .help("Comma-separated output groups: autoSEO,autoContent,autoStructure")
            .default_value("autoSEO,autoContent,autoStructure"),
        Arg::new("image-url").long("image-url").value_name("URL"),
        Arg::new("iframe-url").long("iframe-url").value_name("URL"),
        Arg::new("category-name").long("category-name").value_name("NAME"),
        Arg::new("category-type")
            .long("category-type")
            .value_name("TYPE")
            .default_value(""),
        Arg::new("category-description")
            .long("category-description")
            .value_name("TEXT"),
        Arg::new("provider")
            .short('p')
            .long("provider")
            .value_name("PROVIDER")
            .help("Override the configured provider (mock, gemini, openai)"),
        Arg::new("seed")
            .long("seed")
            .value_name("NUM")
            .help("Fix the random draws for reproducible output")
            .value_parser(clap::value_parser!(u64)),
    ]
}

fn build_cli() -> Command {
    let cli = Command::new("CMS Content AI")
        .version(env!("CARGO_PKG_VERSION"))
        .author("TigreRoll")
        .about("AI content generation for the CMS backend")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (defaults to cms-ai.toml)")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate a content record and print it as JSON")
                .args(request_args()),
        )
        .subcommand(
            Command::new("prompt")
                .about("Print the prompt that would be sent to the provider")
                .args(request_args()),
        )
        .subcommand(Command::new("config").about("Print the effective configuration"));

    #[cfg(feature = "api")]
    let cli = cli.subcommand(
        Command::new("serve").about("Run the HTTP API").arg(
            Arg::new("port")
                .long("port")
                .value_name("PORT")
                .value_parser(clap::value_parser!(u16)),
        ),
    );

    cli
}

fn request_from_matches(matches: &ArgMatches) -> ContentRequest {
    let text = |name: &str| matches.get_one::<String>(name).cloned();

    let mut request = ContentRequest::new(
        text("title").unwrap_or_default(),
        text("description").unwrap_or_default(),
    )
    .with_options(GenerationOptions::parse_list(
        &text("options").unwrap_or_default(),
    ));

    if let Some(url) = text("image-url") {
        request = request.with_image_url(url);
    }
    if let Some(url) = text("iframe-url") {
        request = request.with_iframe_url(url);
    }
    if let Some(name) = text("category-name") {
        let mut category = CategoryInfo::new(name, text("category-type").unwrap_or_default());
        if let Some(description) = text("category-description") {
            category = category.with_description(description);
        }
        request = request.with_category(category);
    }

    request
}

/// Config from file and env, then per-invocation flags
fn load_config(matches: &ArgMatches, sub: Option<&ArgMatches>) -> Result<Config> {
    let path = matches.get_one::<String>("config").map(PathBuf::from);
    let mut config = Config::load(path.as_deref())?;

    if let Some(sub) = sub {
        if let Some(provider) = sub.try_get_one::<String>("provider").ok().flatten() {
            let provider = provider.parse::<LLMProvider>()?;
            // switching drops a credential meant for the previous provider
            config.set_provider(provider);
            if config.ai.api_key.is_none() {
                config.ai.api_key = provider.api_key_env().and_then(|key| std::env::var(key).ok());
            }
        }
        if let Some(seed) = sub.try_get_one::<u64>("seed").ok().flatten() {
            config.generation.seed = Some(*seed);
        }
    }

    config.validate()?;
    Ok(config)
}

fn log_filter(level: &str, verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { level };
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cms_content_ai={},warn", level)))
}

/// Subscriber starts at info; the configured level is swapped in once the config is read
fn init_logging(verbose: bool) -> reload::Handle<EnvFilter, Registry> {
    let (filter, handle) = reload::Layer::new(log_filter("info", verbose));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
    handle
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let verbose = matches.get_flag("verbose");

    let log_handle = init_logging(verbose);

    let (name, sub) = match matches.subcommand() {
        Some((name, sub)) => (name, Some(sub)),
        None => ("", None),
    };
    let config = load_config(&matches, sub)?;
    log_handle.reload(log_filter(&config.logging.level, verbose))?;

    match name {
        "generate" => {
            let request = request_from_matches(sub.unwrap_or(&matches));
            let generator = ContentGenerator::from_config(&config);

            info!("🚀 Generating content for '{}'", request.title);
            match generator.generate_content(&request).await {
                Ok(outcome) => {
                    println!("{}", serde_json::to_string_pretty(&outcome)?);
                }
                Err(e) => {
                    error!("❌ Generation failed [{}]: {}", e.code(), e);
                    if let Some(suggestion) = e.suggestion() {
                        error!("💡 {}", suggestion);
                    }
                    return Err(e.into());
                }
            }
        }
        "prompt" => {
            let request = request_from_matches(sub.unwrap_or(&matches));
            let generator = ContentGenerator::from_config(&config);
            println!("{}", generator.build_prompt(&request));
        }
        "config" => {
            println!("{}", config.summary());
        }
        #[cfg(feature = "api")]
        "serve" => {
            use std::sync::Arc;

            let mut config = config;
            if let Some(port) = sub.and_then(|s| s.get_one::<u16>("port")) {
                config.server.port = *port;
            }
            let generator = Arc::new(ContentGenerator::from_config(&config));
            cms_content_ai::api::ApiServer::new(generator, Arc::new(config))
                .start()
                .await?;
        }
        other => {
            return Err(anyhow::anyhow!("Unknown command: {}", other));
        }
    }

    Ok(())
}
