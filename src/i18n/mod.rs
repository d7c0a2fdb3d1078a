//! Internationalization (i18n) support.
//!
//! - `registry`: supported languages and their metadata
//! - `language`: validated `Language` type
//! - `metrics`: translation counters shared by the translation components
//!
//! # Example
//!
//! ```rust,ignore
//! use multilingual_content::i18n::Language;
//!
//! let arabic = Language::from_code("ar")?;
//! assert!(arabic.is_rtl());
//! ```

mod language;
mod metrics;
mod registry;

pub use language::Language;
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::{LanguageConfig, LanguageRegistry, TextDirection};
