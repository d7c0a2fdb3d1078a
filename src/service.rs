//! Wires the translation stack together from a [`Config`].
//!
//! Everything that used to be process-wide (breaker, caches, metrics) is owned
//! here and shared through `Arc`s, so tests can build isolated instances.

use crate::breaker::{BreakerConfig, CircuitBreaker};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::facade::ContentTranslator;
use crate::i18n::TranslationMetrics;
use crate::providers::{FallbackClient, PrimaryClient};
use crate::translation::HybridTranslator;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const USER_AGENT: &str = concat!("multilingual-content/", env!("CARGO_PKG_VERSION"));

/// How often an open breaker may log at warning level.
const BREAKER_WARNING_INTERVAL: Duration = Duration::from_secs(5 * 60);

pub struct TranslationServices {
    pub metrics: Arc<TranslationMetrics>,
    pub breaker: Arc<CircuitBreaker>,
    pub primary: Arc<PrimaryClient>,
    pub fallback: Arc<FallbackClient>,
    pub translator: Arc<HybridTranslator>,
    pub content: Arc<ContentTranslator>,
}

impl TranslationServices {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        // Per-request timeouts are set by each provider client.
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        let metrics = Arc::new(TranslationMetrics::new());
        let breaker = Arc::new(CircuitBreaker::with_clock(
            BreakerConfig {
                failure_threshold: config.breaker_failure_threshold,
                cooldown: config.breaker_cooldown,
                rate_limit_cooldown: config.breaker_rate_limit_cooldown,
                warning_interval: BREAKER_WARNING_INTERVAL,
            },
            clock.clone(),
        ));

        let primary = Arc::new(PrimaryClient::new(
            http.clone(),
            config,
            clock.clone(),
            metrics.clone(),
        ));
        let fallback = Arc::new(FallbackClient::new(
            http,
            config,
            breaker.clone(),
            metrics.clone(),
        ));
        let translator = Arc::new(HybridTranslator::new(primary.clone(), fallback.clone()));
        let content = Arc::new(ContentTranslator::new(
            translator.clone(),
            config.content_languages,
            config.cache_ttl,
            clock,
            metrics.clone(),
        ));

        info!(
            languages = %format!("{}/{}", config.content_languages.0, config.content_languages.1),
            fallback_enabled = config.fallback_enabled,
            "Translation services ready"
        );

        Ok(Self {
            metrics,
            breaker,
            primary,
            fallback,
            translator,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::i18n::Language;

    #[test]
    fn test_services_share_breaker_and_metrics() {
        let services = TranslationServices::new(&Config::default()).unwrap();

        assert!(std::ptr::eq(services.fallback.breaker(), services.breaker.as_ref()));
        assert!(services.fallback.is_available());
        services.metrics.record_cache_hit();
        assert_eq!(services.metrics.report().cache_hits, 1);
    }

    #[test]
    fn test_disabled_fallback_is_unavailable() {
        let config = Config {
            fallback_enabled: false,
            ..Config::default()
        };
        let services = TranslationServices::new(&config).unwrap();
        assert!(!services.fallback.is_available());
    }

    #[test]
    fn test_content_languages_come_from_config() {
        let config = Config {
            content_languages: (Language::ARABIC, Language::FRENCH),
            ..Config::default()
        };
        let services =
            TranslationServices::with_clock(&config, Arc::new(ManualClock::default())).unwrap();
        assert_eq!(
            services.content.languages(),
            (Language::ARABIC, Language::FRENCH)
        );
    }

    #[test]
    fn test_breaker_threshold_from_config() {
        let config = Config {
            breaker_failure_threshold: 1,
            ..Config::default()
        };
        let services = TranslationServices::new(&config).unwrap();
        services
            .breaker
            .record_failure(&crate::error::ProviderError::Status {
                status: 500,
                body: String::new(),
            });
        assert!(services.breaker.is_open());
    }
}
