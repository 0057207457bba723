use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::StringKind;

/// Quote used when converting a template string to a normal string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// Use whichever normal quote is more common in the document (default).
    #[default]
    Infer,
    /// Always use single quotes.
    Single,
    /// Always use double quotes.
    Double,
}

impl QuoteStyle {
    /// The quote kind to convert to, given the document's inferred default.
    #[must_use]
    pub const fn resolve(self, inferred: StringKind) -> StringKind {
        match self {
            Self::Infer => inferred,
            Self::Single => StringKind::SingleQuoted,
            Self::Double => StringKind::DoubleQuoted,
        }
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConfigError {
    /// Description of the validation error.
    pub message: String,
}

/// Conversion configuration options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preferred quote when leaving template form.
    pub default_quote: QuoteStyle,
    /// File extensions treated as JavaScript or TypeScript, without the dot.
    pub extensions: Vec<String>,
}

impl Config {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension list is empty or holds an empty or
    /// dotted extension.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extensions.is_empty() {
            return Err(ConfigError {
                message: "extensions must not be empty".to_string(),
            });
        }
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(ConfigError {
                message: format!("extensions must be non-empty and have no leading dot, got {bad:?}"),
            });
        }
        Ok(())
    }

    /// Whether `path` has one of the configured extensions.
    #[must_use]
    pub fn supports_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known == ext))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_quote: QuoteStyle::default(),
            extensions: ["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
