//! Editor configuration
//!
//! `EditorConfig` holds the tunables of the interaction state machine. Every
//! field has a serde default, so a partial (or empty) JSON object is a valid
//! configuration file.

use crate::models::{CalloutVariant, HeadingLevel};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Quiescence interval before a draft is committed
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Upper bound for the debounce interval
const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Debounce override (milliseconds)
pub const DEBOUNCE_ENV_VAR: &str = "BLOCKDOC_DEBOUNCE_MS";

/// Strict-reference override ("1"/"true" or "0"/"false")
pub const STRICT_REFERENCES_ENV_VAR: &str = "BLOCKDOC_STRICT_REFERENCES";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Where blocks chosen from the insertion menu are placed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuInsertion {
    /// Always at the end of the document
    #[default]
    Append,
    /// After the block the menu was opened from (falls back to append)
    AfterInvoker,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Milliseconds of input quiescence before a draft is committed
    pub debounce_ms: u64,

    /// Level of headings created from the insertion menu (1-3)
    pub heading_level: u8,

    /// Language of code blocks created from the insertion menu
    pub code_language: String,

    /// Variant of callouts created from the insertion menu
    pub callout_variant: CalloutVariant,

    pub menu_insertion: MenuInsertion,

    /// Surface references to missing blocks as errors instead of logging them
    pub strict_references: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            heading_level: 2,
            code_language: "javascript".to_string(),
            callout_variant: CalloutVariant::Info,
            menu_insertion: MenuInsertion::Append,
            strict_references: false,
        }
    }
}

impl EditorConfig {
    /// Load and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: EditorConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply `BLOCKDOC_DEBOUNCE_MS` and `BLOCKDOC_STRICT_REFERENCES`
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(raw) = lookup(DEBOUNCE_ENV_VAR) {
            self.debounce_ms = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} must be an integer, got '{}'", DEBOUNCE_ENV_VAR, raw))
            })?;
        }

        if let Some(raw) = lookup(STRICT_REFERENCES_ENV_VAR) {
            self.strict_references = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "{} must be a boolean, got '{}'",
                        STRICT_REFERENCES_ENV_VAR, raw
                    )))
                }
            };
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "debounce_ms must be greater than 0".to_string(),
            ));
        }

        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::Invalid(format!(
                "debounce_ms cannot exceed {}",
                MAX_DEBOUNCE_MS
            )));
        }

        HeadingLevel::try_from(self.heading_level)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.code_language.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "code_language cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Heading level for menu-created headings; out-of-range values fall back to 2
    pub fn heading_level(&self) -> HeadingLevel {
        HeadingLevel::try_from(self.heading_level).unwrap_or(HeadingLevel::Two)
    }
}
