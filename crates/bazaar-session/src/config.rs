//! # Session Configuration
//!
//! Configuration for hosts embedding a cart session.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BAZAAR_CURRENCY_CODE=INR                                           │
//! │     BAZAAR_CART_SNAPSHOT=/tmp/cart.json                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/bazaar-market/config.toml (Linux)                        │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [currency]
//! code = "INR"
//! symbol = "₹"
//!
//! [cart]
//! persist = true
//! snapshot_path = "/var/lib/bazaar/cart.json"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Currency used when formatting totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySettings {
    /// ISO 4217 code.
    #[serde(default = "default_currency_code")]
    pub code: String,

    /// Symbol shown before amounts.
    #[serde(default = "default_currency_symbol")]
    pub symbol: String,
}

fn default_currency_code() -> String {
    "INR".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            code: default_currency_code(),
            symbol: default_currency_symbol(),
        }
    }
}

/// Cart persistence settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSettings {
    /// Save the cart after every change and restore it at startup.
    #[serde(default)]
    pub persist: bool,

    /// Where the snapshot lives; defaults to the platform data directory.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub currency: CurrencySettings,

    #[serde(default)]
    pub cart: CartSettings,
}

impl SessionConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    fn load_with<F>(config_path: Option<PathBuf>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let code = &self.currency.code;
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::Invalid(format!(
                "currency code must be three uppercase letters, got: {}",
                code
            )));
        }

        if self.cart.persist && self.snapshot_path().is_none() {
            return Err(ConfigError::Invalid(
                "cart persistence enabled but no snapshot path available".into(),
            ));
        }

        Ok(())
    }

    /// Snapshot path: the configured one, else the platform data directory.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.cart.snapshot_path.clone().or_else(|| {
            Self::project_dirs().map(|dirs| dirs.data_dir().join("cart.json"))
        })
    }

    /// Applies overrides from a key lookup (the environment in production).
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(code) = lookup("BAZAAR_CURRENCY_CODE") {
            debug!(code = %code, "Overriding currency code from environment");
            self.currency.code = code.to_uppercase();
        }

        if let Some(symbol) = lookup("BAZAAR_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }

        if let Some(path) = lookup("BAZAAR_CART_SNAPSHOT") {
            debug!(path = %path, "Overriding snapshot path from environment");
            self.cart.snapshot_path = Some(PathBuf::from(path));
        }

        if let Some(persist) = lookup("BAZAAR_CART_PERSIST") {
            match persist.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.cart.persist = true,
                "0" | "false" | "no" | "off" => self.cart.persist = false,
                _ => warn!(value = %persist, "Unknown BAZAAR_CART_PERSIST value"),
            }
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "bazaar", "market")
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = SessionConfig::default();
        assert_eq!(config.currency.code, "INR");
        assert!(!config.cart.persist);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: SessionConfig = toml::from_str(
            r#"
            [cart]
            persist = true
            snapshot_path = "/tmp/cart.json"
            "#,
        )
        .unwrap();

        assert!(config.cart.persist);
        assert_eq!(config.cart.snapshot_path, Some(PathBuf::from("/tmp/cart.json")));
        assert_eq!(config.currency, CurrencySettings::default());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("BAZAAR_CURRENCY_CODE", "usd"),
            ("BAZAAR_CURRENCY_SYMBOL", "$"),
            ("BAZAAR_CART_SNAPSHOT", "/srv/cart.json"),
            ("BAZAAR_CART_PERSIST", "yes"),
        ]
        .into_iter()
        .collect();

        let mut config = SessionConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.currency.code, "USD");
        assert_eq!(config.currency.symbol, "$");
        assert!(config.cart.persist);
        assert_eq!(config.snapshot_path(), Some(PathBuf::from("/srv/cart.json")));
    }

    #[test]
    fn test_unknown_persist_value_is_ignored() {
        let mut config = SessionConfig::default();
        config.apply_overrides(|key| (key == "BAZAAR_CART_PERSIST").then(|| "maybe".to_string()));
        assert!(!config.cart.persist);
    }

    #[test]
    fn test_validate_rejects_bad_currency() {
        let mut config = SessionConfig::default();
        config.currency.code = "RUPEE".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_file_then_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [currency]
            code = "EUR"
            symbol = "€"

            [cart]
            persist = true
            snapshot_path = "/tmp/from-file.json"
            "#,
        )
        .unwrap();

        let env: HashMap<&str, &str> = [("BAZAAR_CART_SNAPSHOT", "/tmp/from-env.json")]
            .into_iter()
            .collect();
        let config =
            SessionConfig::load_with(Some(path), |key| env.get(key).map(|v| v.to_string()))
                .unwrap();

        assert_eq!(config.currency.code, "EUR");
        assert_eq!(config.currency.symbol, "€");
        assert!(config.cart.persist);
        assert_eq!(config.snapshot_path(), Some(PathBuf::from("/tmp/from-env.json")));
    }

    #[test]
    fn test_load_validates_after_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[currency]\ncode = \"EUR\"\n").unwrap();

        let result = SessionConfig::load_with(Some(path), |key| {
            (key == "BAZAAR_CURRENCY_CODE").then(|| "euro".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            SessionConfig::load_with(Some(dir.path().join("absent.toml")), |_| None).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_load_or_default_falls_back_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();

        let bad_code = dir.path().join("bad-code.toml");
        std::fs::write(&bad_code, "[currency]\ncode = \"RUPEE\"\n").unwrap();
        assert!(matches!(
            SessionConfig::load_with(Some(bad_code.clone()), |_| None),
            Err(ConfigError::Invalid(_))
        ));
        assert_eq!(
            SessionConfig::load_or_default(Some(bad_code)).currency,
            CurrencySettings::default()
        );

        let not_toml = dir.path().join("not-toml.toml");
        std::fs::write(&not_toml, "[cart\npersist = ").unwrap();
        assert!(matches!(
            SessionConfig::load_with(Some(not_toml.clone()), |_| None),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(
            SessionConfig::load_or_default(Some(not_toml)),
            SessionConfig::default()
        );
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = SessionConfig::default();
        config.cart.persist = true;
        config.cart.snapshot_path = Some(dir.path().join("cart.json"));
        config.save(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: SessionConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);
    }
}
