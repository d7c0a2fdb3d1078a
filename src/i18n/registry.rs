//! Language registry: Single source of truth for all supported languages.
//!
//! The registry is static data (it never changes at runtime), so it is
//! exposed through a lazily initialised `OnceLock`.

use std::sync::OnceLock;

/// Writing direction of a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    LeftToRight,
    RightToLeft,
}

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "ar")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Arabic")
    pub name: &'static str,

    /// Native name of the language (e.g., "English", "العربية")
    pub native_name: &'static str,

    pub direction: TextDirection,

    /// Whether this language can be selected as a content language
    pub enabled: bool,
}

/// Registry of every language the platform can display content in.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all enabled languages.
    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }
}

fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            direction: TextDirection::LeftToRight,
            enabled: true,
        },
        LanguageConfig {
            code: "ar",
            name: "Arabic",
            native_name: "العربية",
            direction: TextDirection::RightToLeft,
            enabled: true,
        },
        LanguageConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
            direction: TextDirection::LeftToRight,
            enabled: true,
        },
        LanguageConfig {
            code: "es",
            name: "Spanish",
            native_name: "Español",
            direction: TextDirection::LeftToRight,
            enabled: false,
        },
    ]
}
