use crate::breaker::CircuitBreaker;
use crate::config::Config;
use crate::error::ProviderError;
use crate::i18n::TranslationMetrics;
use crate::providers::FallbackTranslator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct FallbackRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct FallbackResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

/// Client for the self-hosted, authenticated translation endpoint.
///
/// Every outcome is reported to the shared [`CircuitBreaker`]; while it is
/// open no request leaves the process.
pub struct FallbackClient {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
    enabled: bool,
    timeout: Duration,
    breaker: Arc<CircuitBreaker>,
    metrics: Arc<TranslationMetrics>,
}

impl FallbackClient {
    pub fn new(
        http: reqwest::Client,
        config: &Config,
        breaker: Arc<CircuitBreaker>,
        metrics: Arc<TranslationMetrics>,
    ) -> Self {
        Self {
            http,
            url: config.fallback_url.clone(),
            api_key: config.fallback_api_key.clone(),
            enabled: config.fallback_enabled,
            timeout: config.fallback_timeout,
            breaker,
            metrics,
        }
    }

    pub fn is_available(&self) -> bool {
        self.enabled && self.breaker.is_closed()
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Translate `text`, returning the original on any failure or while the
    /// breaker is open.
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> String {
        if text.trim().is_empty() || !self.enabled {
            return text.to_string();
        }
        if !self.breaker.allow_request() {
            return text.to_string();
        }

        self.metrics.record_fallback_call();
        match self.request(text, source, target).await {
            Ok(translated) => {
                self.breaker.record_success();
                debug!(source, target, "Fallback translation succeeded");
                translated
            }
            Err(e) => {
                self.metrics.record_fallback_failure();
                warn!(source, target, error = %e, "Fallback translation failed, keeping original text");
                if self.breaker.record_failure(&e) {
                    self.metrics.record_breaker_open();
                }
                text.to_string()
            }
        }
    }

    async fn request(&self, text: &str, source: &str, target: &str) -> Result<String, ProviderError> {
        let body = FallbackRequest {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .http
            .post(&self.url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout)
                } else {
                    ProviderError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(ProviderError::from_status(status.as_u16(), body));
        }

        let parsed: FallbackResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::UnexpectedShape(format!("invalid JSON: {}", e)))?;

        parsed
            .translated_text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ProviderError::UnexpectedShape("missing translatedText".to_string()))
    }
}

#[async_trait]
impl FallbackTranslator for FallbackClient {
    fn is_available(&self) -> bool {
        FallbackClient::is_available(self)
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> String {
        FallbackClient::translate(self, text, source, target).await
    }
}
