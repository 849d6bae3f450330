//! Controller configuration
//!
//! Loaded from an optional TOML file. Every field has a default so a missing
//! or partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};
use crate::ports::Alert;

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration directory under the platform config dir
const CONFIG_DIR_NAME: &str = "pinlock";

/// Environment variable overriding the config file location
pub const CONFIG_ENV_VAR: &str = "PINLOCK_CONFIG";

/// Default PIN length
pub const DEFAULT_PIN_LENGTH: usize = 6;

/// Title and body of a configurable alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlertText {
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl AlertText {
    fn new(title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: Some(message.to_string()),
        }
    }

    /// Build the alert shown to the user
    pub fn to_alert(&self) -> Alert {
        let alert = Alert::new(self.title.as_str());
        match &self.message {
            Some(message) => alert.with_message(message.as_str()),
            None => alert,
        }
    }
}

/// Alert texts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlertsConfig {
    /// Setup PIN and confirmation differ or are too short
    #[serde(default = "default_pin_mismatch")]
    pub pin_mismatch: AlertText,

    /// Unlock PIN does not match the stored PIN
    #[serde(default = "default_incorrect_pin")]
    pub incorrect_pin: AlertText,
}

fn default_pin_mismatch() -> AlertText {
    AlertText::new("Incorrect PIN", "PINs do not match!")
}

fn default_incorrect_pin() -> AlertText {
    AlertText::new("Incorrect PIN", "Please try again.")
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            pin_mismatch: default_pin_mismatch(),
            incorrect_pin: default_incorrect_pin(),
        }
    }
}

/// Unlock controller configuration
///
/// Unknown keys are rejected so a misspelled setting fails loudly instead of
/// silently falling back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Number of digits in a complete PIN
    #[serde(default = "default_pin_length")]
    pub pin_length: usize,

    /// Text shown by the fingerprint prompt
    #[serde(default = "default_fingerprint_prompt")]
    pub fingerprint_prompt: String,

    #[serde(default)]
    pub alerts: AlertsConfig,
}

fn default_pin_length() -> usize {
    DEFAULT_PIN_LENGTH
}

fn default_fingerprint_prompt() -> String {
    "Unlock your wallet".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            pin_length: DEFAULT_PIN_LENGTH,
            fingerprint_prompt: default_fingerprint_prompt(),
            alerts: AlertsConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Default config file location
    ///
    /// `PINLOCK_CONFIG` wins over the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| AuthError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| AuthError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Load configuration, falling back to defaults
    ///
    /// A missing file is silent; an unreadable or invalid one is logged.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => p,
            None => return Self::default(),
        };

        if !path.exists() {
            return Self::default();
        }

        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring config file: {}", e);
            Self::default()
        })
    }

    /// Reject values the controller cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.pin_length == 0 {
            return Err(AuthError::Config("pin_length must be at least 1".into()));
        }
        Ok(())
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AuthError::Config(e.to_string()))
    }
}
