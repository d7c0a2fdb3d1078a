//! Translation core for a bilingual sports and news platform.
//!
//! A free primary provider is tried first; a self-hosted fallback guarded by a
//! circuit breaker covers for it. Every translation call is total and returns
//! the original text when nothing better is available.

pub mod breaker;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod facade;
pub mod glossary;
pub mod i18n;
pub mod providers;
pub mod retry;
pub mod service;
pub mod translation;

pub use config::Config;
pub use facade::{ContentTranslator, MultilingualContent};
pub use service::TranslationServices;
pub use translation::HybridTranslator;
