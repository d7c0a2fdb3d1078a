use crate::i18n::{Language, LanguageRegistry};
use anyhow::{bail, Context, Result};
use std::time::Duration;

pub const DEFAULT_PRIMARY_URL: &str = "https://translate.googleapis.com/translate_a/single";
pub const DEFAULT_FALLBACK_URL: &str = "http://localhost:5000/translate";

#[derive(Debug, Clone)]
pub struct Config {
    // Primary provider
    pub primary_url: String,
    pub primary_client_id: String,
    pub primary_timeout: Duration,

    // Fallback provider
    pub fallback_url: String,
    pub fallback_api_key: Option<String>,
    pub fallback_enabled: bool,
    pub fallback_timeout: Duration,

    // Circuit breaker
    pub breaker_cooldown: Duration,
    pub breaker_rate_limit_cooldown: Duration,
    pub breaker_failure_threshold: u32,

    // Caching and pacing
    pub cache_ttl: Duration,
    pub batch_size: usize,
    pub batch_pause: Duration,

    /// The two languages every piece of content is rendered in
    pub content_languages: (Language, Language),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary_url: DEFAULT_PRIMARY_URL.to_string(),
            primary_client_id: "gtx".to_string(),
            primary_timeout: Duration::from_secs(10),
            fallback_url: DEFAULT_FALLBACK_URL.to_string(),
            fallback_api_key: None,
            fallback_enabled: true,
            fallback_timeout: Duration::from_secs(15),
            breaker_cooldown: Duration::from_secs(10 * 60),
            breaker_rate_limit_cooldown: Duration::from_secs(60 * 60),
            breaker_failure_threshold: 3,
            cache_ttl: Duration::from_secs(24 * 60 * 60),
            batch_size: 5,
            batch_pause: Duration::from_millis(200),
            content_languages: (Language::ENGLISH, Language::ARABIC),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let fallback_disabled = std::env::var("FALLBACK_DISABLED")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let content_languages = match std::env::var("CONTENT_LANGUAGES") {
            Ok(value) => parse_language_pair(&value).context("Invalid CONTENT_LANGUAGES")?,
            Err(_) => defaults.content_languages,
        };

        let config = Self {
            primary_url: std::env::var("PRIMARY_TRANSLATE_URL").unwrap_or(defaults.primary_url),
            primary_client_id: std::env::var("PRIMARY_CLIENT_ID")
                .unwrap_or(defaults.primary_client_id),
            primary_timeout: env_secs("PRIMARY_TIMEOUT_SECS").unwrap_or(defaults.primary_timeout),

            fallback_url: std::env::var("FALLBACK_TRANSLATE_URL").unwrap_or(defaults.fallback_url),
            fallback_api_key: std::env::var("FALLBACK_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            fallback_enabled: !fallback_disabled,
            fallback_timeout: env_secs("FALLBACK_TIMEOUT_SECS")
                .unwrap_or(defaults.fallback_timeout),

            breaker_cooldown: env_secs("BREAKER_COOLDOWN_SECS").unwrap_or(defaults.breaker_cooldown),
            breaker_rate_limit_cooldown: env_secs("BREAKER_RATE_LIMIT_COOLDOWN_SECS")
                .unwrap_or(defaults.breaker_rate_limit_cooldown),
            breaker_failure_threshold: env_parse("BREAKER_FAILURE_THRESHOLD")
                .unwrap_or(defaults.breaker_failure_threshold),

            cache_ttl: env_secs("TRANSLATION_CACHE_TTL_SECS").unwrap_or(defaults.cache_ttl),
            batch_size: env_parse("BATCH_SIZE").unwrap_or(defaults.batch_size),
            batch_pause: env_parse("BATCH_PAUSE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.batch_pause),

            content_languages,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("BATCH_SIZE must be at least 1");
        }
        if self.breaker_failure_threshold == 0 {
            bail!("BREAKER_FAILURE_THRESHOLD must be at least 1");
        }
        if self.content_languages.0 == self.content_languages.1 {
            bail!("CONTENT_LANGUAGES must name two different languages");
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn env_secs(name: &str) -> Option<Duration> {
    env_parse::<u64>(name).map(Duration::from_secs)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse "en,ar" into a language pair.
fn parse_language_pair(value: &str) -> Result<(Language, Language)> {
    let codes: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    if codes.len() != 2 {
        bail!(
            "Expected two comma-separated language codes (supported: {}), got '{}'",
            supported_languages(),
            value
        );
    }
    let parse = |code: &str| {
        Language::from_code(code)
            .with_context(|| format!("Supported content languages: {}", supported_languages()))
    };
    Ok((parse(codes[0])?, parse(codes[1])?))
}

fn supported_languages() -> String {
    LanguageRegistry::get()
        .list_enabled()
        .iter()
        .map(|lang| lang.code)
        .collect::<Vec<_>>()
        .join(", ")
}
