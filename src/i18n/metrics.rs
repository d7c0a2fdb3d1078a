//! Translation metrics and observability module.
//!
//! One `TranslationMetrics` is created by the composition root and shared
//! (via `Arc`) with every translation component.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Primary provider translations served from its cache
    cache_hits: AtomicUsize,

    /// Primary provider lookups that had to go to the network
    cache_misses: AtomicUsize,

    /// Multilingual content served from the facade cache
    content_cache_hits: AtomicUsize,
    content_cache_misses: AtomicUsize,

    /// Terms resolved from the static glossary
    glossary_hits: AtomicUsize,

    primary_calls: AtomicUsize,
    primary_failures: AtomicUsize,
    fallback_calls: AtomicUsize,
    fallback_failures: AtomicUsize,

    /// Number of times the fallback breaker opened
    breaker_opens: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_content_cache_hit(&self) {
        self.content_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_content_cache_miss(&self) {
        self.content_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_glossary_hit(&self) {
        self.glossary_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_primary_call(&self) {
        self.primary_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_primary_failure(&self) {
        self.primary_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback_call(&self) {
        self.fallback_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback_failure(&self) {
        self.fallback_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_breaker_open(&self) {
        self.breaker_opens.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn content_cache_hits(&self) -> usize {
        self.content_cache_hits.load(Ordering::Relaxed)
    }

    pub fn content_cache_misses(&self) -> usize {
        self.content_cache_misses.load(Ordering::Relaxed)
    }

    pub fn glossary_hits(&self) -> usize {
        self.glossary_hits.load(Ordering::Relaxed)
    }

    pub fn primary_calls(&self) -> usize {
        self.primary_calls.load(Ordering::Relaxed)
    }

    pub fn primary_failures(&self) -> usize {
        self.primary_failures.load(Ordering::Relaxed)
    }

    pub fn fallback_calls(&self) -> usize {
        self.fallback_calls.load(Ordering::Relaxed)
    }

    pub fn fallback_failures(&self) -> usize {
        self.fallback_failures.load(Ordering::Relaxed)
    }

    pub fn breaker_opens(&self) -> usize {
        self.breaker_opens.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let content_hits = self.content_cache_hits();
        let content_misses = self.content_cache_misses();

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate: percentage(hits, hits + misses),
            content_cache_hits: content_hits,
            content_cache_misses: content_misses,
            content_cache_hit_rate: percentage(content_hits, content_hits + content_misses),
            glossary_hits: self.glossary_hits(),
            primary_calls: self.primary_calls(),
            primary_failures: self.primary_failures(),
            primary_success_rate: success_rate(self.primary_calls(), self.primary_failures()),
            fallback_calls: self.fallback_calls(),
            fallback_failures: self.fallback_failures(),
            fallback_success_rate: success_rate(self.fallback_calls(), self.fallback_failures()),
            breaker_opens: self.breaker_opens(),
        }
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

fn success_rate(calls: usize, failures: usize) -> f64 {
    percentage(calls.saturating_sub(failures), calls)
}

/// Metrics report containing current translation statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Primary provider cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    pub content_cache_hits: usize,
    pub content_cache_misses: usize,

    /// Facade cache hit rate as a percentage (0-100)
    pub content_cache_hit_rate: f64,

    pub glossary_hits: usize,

    pub primary_calls: usize,
    pub primary_failures: usize,

    /// Primary provider success rate as a percentage (0-100)
    pub primary_success_rate: f64,

    pub fallback_calls: usize,
    pub fallback_failures: usize,

    /// Fallback provider success rate as a percentage (0-100)
    pub fallback_success_rate: f64,

    pub breaker_opens: usize,
}
