use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    currency::{DEFAULT_CURRENCY, DEFAULT_LOCALE},
    errors::PriceError,
    rewrite::{InvalidPricePolicy, RewriteSettings, DEFAULT_MARKER_CLASS, DEFAULT_PRICE_ATTRIBUTE},
    utils::{self, persistence},
};

/// Settings for the price pass, stored as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default = "Config::default_marker_class")]
    pub marker_class: String,
    #[serde(default = "Config::default_price_attribute")]
    pub price_attribute: String,
    #[serde(default)]
    pub invalid_policy: InvalidPricePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            marker_class: Self::default_marker_class(),
            price_attribute: Self::default_price_attribute(),
            invalid_policy: InvalidPricePolicy::default(),
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        DEFAULT_LOCALE.into()
    }

    pub fn default_currency() -> String {
        DEFAULT_CURRENCY.into()
    }

    pub fn default_marker_class() -> String {
        DEFAULT_MARKER_CLASS.into()
    }

    pub fn default_price_attribute() -> String {
        DEFAULT_PRICE_ATTRIBUTE.into()
    }

    /// Rejects selectors the pass could never match.
    pub fn validate(&self) -> Result<(), PriceError> {
        let class = self.marker_class.trim();
        if class.is_empty() || class.contains(char::is_whitespace) {
            return Err(PriceError::Config(format!(
                "marker class `{}` must be a single non-empty class token",
                self.marker_class
            )));
        }
        if self.price_attribute.trim().is_empty() {
            return Err(PriceError::Config(
                "price attribute name must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn rewrite_settings(&self) -> RewriteSettings {
        RewriteSettings {
            marker_class: self.marker_class.trim().to_string(),
            price_attribute: self.price_attribute.trim().to_string(),
            invalid_policy: self.invalid_policy,
        }
    }
}

/// Loads and persists [`Config`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Manager for the default location under the application data directory.
    pub fn new() -> Self {
        Self::with_path(utils::config_file())
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> Result<Config, PriceError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: Config = serde_json::from_str(&data)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), PriceError> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        persistence::write_atomic(&self.path, json.as_bytes())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
