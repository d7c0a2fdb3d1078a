//! Translation provider clients.
//!
//! - `primary`: fast, unauthenticated endpoint with its own response cache
//! - `fallback`: self-hosted endpoint guarded by a circuit breaker
//!
//! Both clients are total: failures degrade to the original text and are
//! never returned to the caller. The traits below are the seams the
//! orchestrator depends on.

mod fallback;
mod primary;

pub use fallback::FallbackClient;
pub use primary::{cache_key, parse_primary_response, sanitize_for_retry, PrimaryClient};

use async_trait::async_trait;

/// Outcome of a primary-provider call.
///
/// `translated` is false when the provider could not produce a translation
/// and `text` is the untouched input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub translated: bool,
}

impl Translation {
    pub fn translated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            translated: true,
        }
    }

    pub fn untranslated(original: impl Into<String>) -> Self {
        Self {
            text: original.into(),
            translated: false,
        }
    }
}

#[async_trait]
pub trait PrimaryTranslator: Send + Sync {
    async fn translate_tagged(&self, text: &str, source: &str, target: &str) -> Translation;

    /// Translate many texts; output order matches input order.
    async fn translate_batch(&self, texts: &[String], source: &str, target: &str) -> Vec<String>;
}

#[async_trait]
pub trait FallbackTranslator: Send + Sync {
    /// Whether a call right now would actually reach the provider.
    fn is_available(&self) -> bool;

    /// Returns the original text on any failure.
    async fn translate(&self, text: &str, source: &str, target: &str) -> String;
}
