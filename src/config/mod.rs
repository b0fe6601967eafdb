//! Configuration management for simdash.
//!
//! Settings live in a TOML file under the platform config directory
//! (`~/.config/simdash/config.toml` on Linux). A missing file is not an
//! error: every section falls back to its defaults.

mod settings;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub use settings::{BackendSettings, FormSettings, SearchSettings, UiSettings};

/// Name of the configuration file.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while loading, validating or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform configuration directory could not be determined.
    #[error("could not determine configuration directory")]
    NoConfigDir,

    /// The configuration directory could not be created.
    #[error("failed to create configuration directory: {0}")]
    CreateDirError(#[source] std::io::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    ReadError(#[source] std::io::Error),

    /// The configuration file could not be written.
    #[error("failed to write configuration file: {0}")]
    WriteError(#[source] std::io::Error),

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A value is out of range or malformed.
    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The full application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend connection.
    pub backend: BackendSettings,
    /// Ticker search behavior.
    pub search: SearchSettings,
    /// Initial form values.
    pub form: FormSettings,
    /// Terminal UI settings.
    pub ui: UiSettings,
}

impl Config {
    /// Load the configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load the configuration from `path`, falling back to defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;

        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Save the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(ConfigError::WriteError)?;

        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// The default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("simdash").join(CONFIG_FILE_NAME))
    }

    /// Check value ranges and formats.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` describing the first problem.
    pub fn validate(&self) -> Result<()> {
        let url = self.backend.base_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "backend.base_url '{}' must start with http:// or https://",
                url
            )));
        }

        if self.search.max_visible_candidates == 0 {
            return Err(ConfigError::ValidationError(
                "search.max_visible_candidates must be at least 1".to_string(),
            ));
        }

        if let Some(bad) = self
            .form
            .default_tickers
            .iter()
            .find(|t| t.trim().is_empty() || t.contains(','))
        {
            return Err(ConfigError::ValidationError(format!(
                "form.default_tickers contains an invalid symbol '{}'",
                bad
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.form.default_tickers, vec!["TSLA", "NVDA", "MSFT"]);
        assert!(!config.search.discard_stale_results);
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = Config::default();
        config.backend.base_url = "https://sim.example.com".to_string();
        config.search.discard_stale_results = true;
        config.form.default_tickers = vec!["VOO".to_string()];
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[search]\ndiscard_stale_results = true\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.search.discard_stale_results);
        assert_eq!(config.search.max_visible_candidates, 8);
        assert_eq!(config.backend, BackendSettings::default());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[search\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = Config::default();
        config.backend.base_url = "localhost:5000".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_visible_rows() {
        let mut config = Config::default();
        config.search.max_visible_candidates = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_ticker() {
        let mut config = Config::default();
        config.form.default_tickers = vec!["TSLA".to_string(), " ".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_tickers"));
    }
}
