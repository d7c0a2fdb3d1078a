use crate::cache::TtlCache;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::ProviderError;
use crate::i18n::TranslationMetrics;
use crate::providers::{PrimaryTranslator, Translation};
use crate::retry::{with_retry, RetryConfig};
use async_trait::async_trait;
use futures::future::join_all;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, warn};

/// Longest percent-encoded text kept verbatim in a cache key.
const MAX_KEY_TEXT_LEN: usize = 200;

/// Everything that is not a word character, whitespace, or Arabic script.
static RETRY_STRIP_REGEX: OnceLock<Regex> = OnceLock::new();

fn retry_strip_regex() -> &'static Regex {
    RETRY_STRIP_REGEX
        .get_or_init(|| Regex::new(r"[^\w\s\x{0600}-\x{06FF}]").expect("Invalid strip regex"))
}

/// Build the cache key for a (source, target, text) triple.
///
/// The text is percent-encoded and cut to a bounded length. When it had to be
/// cut, a digest of the full text is appended so long texts sharing a prefix
/// still get distinct keys.
pub fn cache_key(source: &str, target: &str, text: &str) -> String {
    let encoded = utf8_percent_encode(text, NON_ALPHANUMERIC).to_string();
    if encoded.len() <= MAX_KEY_TEXT_LEN {
        return format!("{}:{}:{}", source, target, encoded);
    }

    // Percent-encoded output is pure ASCII, so any byte index is a char boundary.
    let digest = blake3::hash(text.as_bytes()).to_hex();
    format!(
        "{}:{}:{}#{}",
        source,
        target,
        &encoded[..MAX_KEY_TEXT_LEN],
        &digest.as_str()[..16]
    )
}

/// Light clean-up applied to the text before the single retry.
///
/// Punctuation and symbols become spaces, then whitespace is collapsed.
pub fn sanitize_for_retry(text: &str) -> String {
    retry_strip_regex()
        .replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the translated text from the provider's nested-array response.
///
/// Accepted shapes:
/// - `[[["segment", "source", ...], ["segment", ...], ...], ...]`: segments
///   at `[0][i][0]` are joined in order
/// - `[["text", ...], ...]`: the string at `[0][0]`
pub fn parse_primary_response(body: &Value) -> Result<String, ProviderError> {
    let shape_error = |what: &str| ProviderError::UnexpectedShape(what.to_string());

    let first = body
        .as_array()
        .ok_or_else(|| shape_error("response is not an array"))?
        .first()
        .ok_or_else(|| shape_error("response array is empty"))?
        .as_array()
        .ok_or_else(|| shape_error("[0] is not an array"))?;

    let text = match first.first() {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(_)) => first
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect::<String>(),
        Some(_) => return Err(shape_error("[0][0] is neither a string nor an array")),
        None => return Err(shape_error("[0] is empty")),
    };

    if text.trim().is_empty() {
        return Err(shape_error("translation is empty"));
    }
    Ok(text)
}

/// Client for the fast, unauthenticated translation endpoint.
pub struct PrimaryClient {
    http: reqwest::Client,
    url: String,
    client_id: String,
    timeout: Duration,
    retry: RetryConfig,
    batch_size: usize,
    batch_pause: Duration,
    cache: TtlCache<String, String>,
    metrics: Arc<TranslationMetrics>,
}

impl PrimaryClient {
    pub fn new(
        http: reqwest::Client,
        config: &Config,
        clock: Arc<dyn Clock>,
        metrics: Arc<TranslationMetrics>,
    ) -> Self {
        Self {
            http,
            url: config.primary_url.clone(),
            client_id: config.primary_client_id.clone(),
            timeout: config.primary_timeout,
            retry: RetryConfig::primary_provider(),
            batch_size: config.batch_size.max(1),
            batch_pause: config.batch_pause,
            cache: TtlCache::with_clock(config.cache_ttl, clock),
            metrics,
        }
    }

    /// Override the retry policy. At least one attempt is always made.
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = RetryConfig {
            max_attempts: retry.max_attempts.max(1),
            ..retry
        };
        self
    }

    /// Translate `text`, returning the original on any failure.
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> String {
        self.translate_tagged(text, source, target).await.text
    }

    /// Translate `text` and report whether a translation was actually obtained.
    pub async fn translate_tagged(&self, text: &str, source: &str, target: &str) -> Translation {
        if text.trim().is_empty() {
            return Translation::untranslated(text);
        }

        let key = cache_key(source, target, text);
        if let Some(cached) = self.cache.get(&key) {
            self.metrics.record_cache_hit();
            debug!(source, target, "Primary translation cache hit");
            return Translation::translated(cached);
        }
        self.metrics.record_cache_miss();

        let sanitized = sanitize_for_retry(text);
        let retry = if sanitized.is_empty() {
            RetryConfig {
                max_attempts: 1,
                ..self.retry.clone()
            }
        } else {
            self.retry.clone()
        };

        let sanitized = sanitized.as_str();
        let result = with_retry(&retry, "Primary translation", |attempt| {
            let payload = if attempt == 0 { text } else { sanitized };
            self.request(payload, source, target)
        })
        .await;

        match result {
            Ok(translated) => {
                self.cache.set(key, translated.clone());
                Translation::translated(translated)
            }
            Err(e) => {
                warn!(source, target, error = %e, "Primary translation failed, keeping original text");
                Translation::untranslated(text)
            }
        }
    }

    /// Translate a list in fixed-size chunks.
    ///
    /// Items within a chunk run concurrently; chunks run one after another
    /// with `batch_pause` in between. A failed item keeps its original text.
    pub async fn translate_batch(&self, texts: &[String], source: &str, target: &str) -> Vec<String> {
        let mut results = Vec::with_capacity(texts.len());

        for (index, chunk) in texts.chunks(self.batch_size).enumerate() {
            if index > 0 && !self.batch_pause.is_zero() {
                tokio::time::sleep(self.batch_pause).await;
            }
            let translated =
                join_all(chunk.iter().map(|text| self.translate(text, source, target))).await;
            results.extend(translated);
        }

        results
    }

    pub fn cache(&self) -> &TtlCache<String, String> {
        &self.cache
    }

    async fn request(&self, text: &str, source: &str, target: &str) -> Result<String, ProviderError> {
        self.metrics.record_primary_call();
        let result = tokio::time::timeout(self.timeout, self.fetch(text, source, target))
            .await
            .unwrap_or_else(|_| Err(ProviderError::Timeout(self.timeout)));
        if result.is_err() {
            self.metrics.record_primary_failure();
        }
        result
    }

    async fn fetch(&self, text: &str, source: &str, target: &str) -> Result<String, ProviderError> {
        let response = self
            .http
            .get(&self.url)
            .query(&[
                ("client", self.client_id.as_str()),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(ProviderError::from_status(status.as_u16(), body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::UnexpectedShape(format!("invalid JSON: {}", e)))?;

        parse_primary_response(&body)
    }
}

#[async_trait]
impl PrimaryTranslator for PrimaryClient {
    async fn translate_tagged(&self, text: &str, source: &str, target: &str) -> Translation {
        PrimaryClient::translate_tagged(self, text, source, target).await
    }

    async fn translate_batch(&self, texts: &[String], source: &str, target: &str) -> Vec<String> {
        PrimaryClient::translate_batch(self, texts, source, target).await
    }
}
