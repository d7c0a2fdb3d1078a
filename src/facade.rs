//! Domain helpers that render sports content in both content languages.
//!
//! Lookup order for every helper: glossary, then this facade's own cache,
//! then the hybrid translator. The facade cache is separate from the primary
//! provider's cache and stores whole [`MultilingualContent`] values.

use crate::cache::TtlCache;
use crate::clock::Clock;
use crate::glossary::{self, GlossaryEntry, TermKind};
use crate::i18n::{Language, TranslationMetrics};
use crate::translation::{HybridTranslator, AUTO_DETECT};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Text rendered in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedText {
    language: &'static str,
    /// Right-to-left script, for clients that set `dir` on the element
    rtl: bool,
    text: String,
}

impl LocalizedText {
    pub fn language(&self) -> &'static str {
        self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_rtl(&self) -> bool {
        self.rtl
    }
}

/// A piece of content with its original text and both renderings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultilingualContent {
    original: String,
    language_a: LocalizedText,
    language_b: LocalizedText,
}

impl MultilingualContent {
    fn new(original: &str, (lang_a, lang_b): (Language, Language), text_a: String, text_b: String) -> Self {
        Self {
            original: original.to_string(),
            language_a: LocalizedText {
                language: lang_a.code(),
                rtl: lang_a.is_rtl(),
                text: text_a,
            },
            language_b: LocalizedText {
                language: lang_b.code(),
                rtl: lang_b.is_rtl(),
                text: text_b,
            },
        }
    }

    fn untranslated(original: &str, languages: (Language, Language)) -> Self {
        Self::new(original, languages, original.to_string(), original.to_string())
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn language_a(&self) -> &LocalizedText {
        &self.language_a
    }

    pub fn language_b(&self) -> &LocalizedText {
        &self.language_b
    }

    /// Text to display for `language`; the original when it is neither
    /// content language.
    pub fn for_language(&self, language: &str) -> &str {
        if language == self.language_a.language {
            &self.language_a.text
        } else if language == self.language_b.language {
            &self.language_b.text
        } else {
            &self.original
        }
    }

    /// Whether at least one rendering differs from the original.
    pub fn is_translated(&self) -> bool {
        self.language_a.text != self.original || self.language_b.text != self.original
    }
}

pub struct ContentTranslator {
    translator: Arc<HybridTranslator>,
    languages: (Language, Language),
    cache: TtlCache<String, MultilingualContent>,
    metrics: Arc<TranslationMetrics>,
}

impl ContentTranslator {
    pub fn new(
        translator: Arc<HybridTranslator>,
        languages: (Language, Language),
        cache_ttl: Duration,
        clock: Arc<dyn Clock>,
        metrics: Arc<TranslationMetrics>,
    ) -> Self {
        Self {
            translator,
            languages,
            cache: TtlCache::with_clock(cache_ttl, clock),
            metrics,
        }
    }

    pub fn languages(&self) -> (Language, Language) {
        self.languages
    }

    pub async fn team_name(&self, name: &str) -> MultilingualContent {
        self.localize(Some(TermKind::Team), name).await
    }

    pub async fn match_status(&self, status: &str) -> MultilingualContent {
        self.localize(Some(TermKind::MatchStatus), status).await
    }

    pub async fn standing_description(&self, description: &str) -> MultilingualContent {
        self.localize(Some(TermKind::Standing), description).await
    }

    pub async fn transfer_type(&self, transfer_type: &str) -> MultilingualContent {
        self.localize(Some(TermKind::TransferType), transfer_type).await
    }

    /// Free text such as headlines; no glossary lookup.
    pub async fn content(&self, text: &str) -> MultilingualContent {
        self.localize(None, text).await
    }

    /// Localize many team names at once through the batch path.
    pub async fn team_names(&self, names: &[String]) -> Vec<MultilingualContent> {
        self.localize_batch(TermKind::Team, names).await
    }

    /// Drop expired facade cache entries; returns how many were removed.
    pub fn clean_expired(&self) -> usize {
        self.cache.clean_expired()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn content_key(&self, text: &str) -> String {
        format!(
            "{}:{}:{}",
            self.languages.0.code(),
            self.languages.1.code(),
            blake3::hash(text.as_bytes()).to_hex()
        )
    }

    /// Resolve from the glossary alone, if it covers both languages.
    fn from_glossary(&self, kind: Option<TermKind>, text: &str) -> Option<MultilingualContent> {
        let entry = glossary::lookup(kind?, text)?;
        let text_a = entry.translation(self.languages.0.code())?;
        let text_b = entry.translation(self.languages.1.code())?;
        self.metrics.record_glossary_hit();
        Some(MultilingualContent::new(
            text,
            self.languages,
            text_a.to_string(),
            text_b.to_string(),
        ))
    }

    async fn localize(&self, kind: Option<TermKind>, text: &str) -> MultilingualContent {
        if text.trim().is_empty() {
            return MultilingualContent::untranslated(text, self.languages);
        }

        if let Some(content) = self.from_glossary(kind, text) {
            debug!(term = text, "Resolved from glossary");
            return content;
        }

        let key = self.content_key(text);
        if let Some(cached) = self.cache.get(&key) {
            self.metrics.record_content_cache_hit();
            return cached;
        }
        self.metrics.record_content_cache_miss();

        let entry = kind.and_then(|kind| glossary::lookup(kind, text));
        let (text_a, text_b) = tokio::join!(
            self.render(entry, self.languages.0, text),
            self.render(entry, self.languages.1, text)
        );

        let content = MultilingualContent::new(text, self.languages, text_a, text_b);
        self.cache.set(key, content.clone());
        content
    }

    async fn render(&self, entry: Option<&GlossaryEntry>, language: Language, text: &str) -> String {
        if let Some(known) = entry.and_then(|e| e.translation(language.code())) {
            return known.to_string();
        }
        self.translator
            .translate(text, AUTO_DETECT, language.code())
            .await
    }

    async fn localize_batch(&self, kind: TermKind, texts: &[String]) -> Vec<MultilingualContent> {
        let mut results: Vec<Option<MultilingualContent>> = Vec::with_capacity(texts.len());
        let mut pending: Vec<(usize, String)> = Vec::new();

        for (index, text) in texts.iter().enumerate() {
            let resolved = if text.trim().is_empty() {
                Some(MultilingualContent::untranslated(text, self.languages))
            } else if let Some(content) = self.from_glossary(Some(kind), text) {
                Some(content)
            } else {
                let cached = self.cache.get(&self.content_key(text));
                if cached.is_some() {
                    self.metrics.record_content_cache_hit();
                } else {
                    self.metrics.record_content_cache_miss();
                    pending.push((index, text.clone()));
                }
                cached
            };
            results.push(resolved);
        }

        if !pending.is_empty() {
            let misses: Vec<String> = pending.iter().map(|(_, text)| text.clone()).collect();
            // One language after the other so at most one chunk is in flight.
            let rendered_a = self
                .translator
                .translate_batch(&misses, AUTO_DETECT, self.languages.0.code())
                .await;
            let rendered_b = self
                .translator
                .translate_batch(&misses, AUTO_DETECT, self.languages.1.code())
                .await;

            for (((index, text), text_a), text_b) in
                pending.into_iter().zip(rendered_a).zip(rendered_b)
            {
                let content = MultilingualContent::new(&text, self.languages, text_a, text_b);
                self.cache.set(self.content_key(&text), content.clone());
                results[index] = Some(content);
            }
        }

        // Every slot is filled above; the fallback only guards against a
        // provider returning a short batch.
        results
            .into_iter()
            .zip(texts)
            .map(|(content, text)| {
                content.unwrap_or_else(|| MultilingualContent::untranslated(text, self.languages))
            })
            .collect()
    }
}
