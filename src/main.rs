use anyhow::{bail, Result};
use multilingual_content::{config::Config, TranslationServices};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("multilingual_content=info".parse()?),
        )
        .init();

    let texts: Vec<String> = std::env::args().skip(1).collect();
    if texts.is_empty() {
        bail!("Usage: multilingual-content <text>...");
    }

    let config = Config::from_env()?;
    let services = TranslationServices::new(&config)?;

    let (lang_a, lang_b) = config.content_languages;
    info!(
        "Content languages: {} ({}) and {} ({})",
        lang_a.name(),
        lang_a.native_name(),
        lang_b.name(),
        lang_b.native_name()
    );

    info!("Translating {} text(s)", texts.len());
    for text in &texts {
        let content = services.content.content(text).await;
        println!("{}", serde_json::to_string(&content)?);
    }

    let report = services.metrics.report();
    info!(
        cache_hit_rate = report.cache_hit_rate,
        content_cache_hit_rate = report.content_cache_hit_rate,
        glossary_hits = report.glossary_hits,
        primary_calls = report.primary_calls,
        primary_failures = report.primary_failures,
        fallback_calls = report.fallback_calls,
        fallback_failures = report.fallback_failures,
        breaker_opens = report.breaker_opens,
        "Translation metrics"
    );

    Ok(())
}
