//! Language type: validated language representation.

use crate::i18n::{LanguageConfig, LanguageRegistry, TextDirection};
use anyhow::{bail, Result};

/// A language that has been validated against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "ar")
    code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };

    pub const ARABIC: Language = Language { code: "ar" };

    pub const FRENCH: Language = Language { code: "fr" };

    /// Create a Language from a language code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is valid and the language is enabled
    /// * `Err` if the code is not found or the language is disabled
    pub fn from_code(code: &str) -> Result<Language> {
        let registry = LanguageRegistry::get();
        let normalized = code.trim().to_ascii_lowercase();

        match registry.get_by_code(&normalized) {
            Some(config) if config.enabled => Ok(Language { code: config.code }),
            Some(_) => bail!("Language '{}' is not enabled", code),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for values built through `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn is_rtl(&self) -> bool {
        self.config().direction == TextDirection::RightToLeft
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code)
    }
}
