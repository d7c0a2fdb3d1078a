//! Hybrid translation: primary provider first, fallback provider when the
//! primary could not translate and the fallback's breaker allows it.
//!
//! Every public method is total: on any failure the caller gets the original
//! text back.

use crate::providers::{FallbackTranslator, PrimaryTranslator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Source language value that asks the provider to detect it.
pub const AUTO_DETECT: &str = "auto";

pub struct HybridTranslator {
    primary: Arc<dyn PrimaryTranslator>,
    fallback: Arc<dyn FallbackTranslator>,
    primary_first: AtomicBool,
}

impl HybridTranslator {
    pub fn new(primary: Arc<dyn PrimaryTranslator>, fallback: Arc<dyn FallbackTranslator>) -> Self {
        Self {
            primary,
            fallback,
            primary_first: AtomicBool::new(true),
        }
    }

    /// Choose which provider is asked first.
    pub fn set_primary_first(&self, primary_first: bool) {
        self.primary_first.store(primary_first, Ordering::Relaxed);
    }

    pub fn is_primary_first(&self) -> bool {
        self.primary_first.load(Ordering::Relaxed)
    }

    pub async fn translate(&self, text: &str, source: &str, target: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        if self.is_primary_first() {
            self.translate_primary_first(text, source, target).await
        } else {
            self.translate_fallback_first(text, source, target).await
        }
    }

    /// Translate with automatic source-language detection.
    pub async fn translate_auto(&self, text: &str, target: &str) -> String {
        self.translate(text, AUTO_DETECT, target).await
    }

    /// Batch translation always goes through the primary provider's batch
    /// path; failed items come back as their original text.
    pub async fn translate_batch(&self, texts: &[String], source: &str, target: &str) -> Vec<String> {
        if texts.is_empty() {
            return Vec::new();
        }
        self.primary.translate_batch(texts, source, target).await
    }

    async fn translate_primary_first(&self, text: &str, source: &str, target: &str) -> String {
        let outcome = self.primary.translate_tagged(text, source, target).await;
        if outcome.translated {
            return outcome.text;
        }

        if self.fallback.is_available() {
            debug!(source, target, "Primary provider could not translate, trying fallback");
            return self.fallback.translate(text, source, target).await;
        }

        debug!(source, target, "Fallback unavailable, returning original text");
        text.to_string()
    }

    async fn translate_fallback_first(&self, text: &str, source: &str, target: &str) -> String {
        if self.fallback.is_available() {
            let translated = self.fallback.translate(text, source, target).await;
            if translated != text {
                return translated;
            }
            debug!(source, target, "Fallback provider could not translate, trying primary");
        }

        self.primary.translate_tagged(text, source, target).await.text
    }
}
