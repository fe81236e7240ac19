//! Configuration management for ecotrack.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::analytics::{CategoryFilter, ReportFilter, ReportRange};
use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "ecotrack";

/// Default session snapshot file name.
const SESSION_FILE_NAME: &str = "session.json";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ECOTRACK_`, with `__`
///    between section and key, e.g. `ECOTRACK_REPORT__DEFAULT_RANGE`)
/// 2. TOML config file at `~/.config/ecotrack/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Catalog configuration.
    pub catalog: CatalogConfig,
    /// Reporting configuration.
    pub report: ReportConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for ecotrack data files.
    /// Defaults to `~/.local/share/ecotrack`
    pub data_dir: Option<PathBuf>,
    /// Path to the session snapshot file.
    /// Defaults to `<data_dir>/session.json`
    pub session_file: Option<PathBuf>,
}

/// Catalog-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to a TOML file overriding the built-in demo catalog.
    /// When unset, the built-in catalog is used as is.
    pub path: Option<PathBuf>,
}

/// Reporting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Time range used when no `--range` is given.
    /// One of `week`, `month`, `quarter`, `year`, `all`.
    pub default_range: String,
    /// Category filter used when no `--category` is given.
    /// `all` or a category name.
    pub default_category: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_range: "month".to_string(),
            default_category: "all".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `ECOTRACK_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("ECOTRACK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if ReportRange::parse(&self.report.default_range).is_none() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "unknown default_range: {} (expected week, month, quarter, year, or all)",
                    self.report.default_range
                ),
            });
        }

        if CategoryFilter::parse(&self.report.default_category).is_none() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "unknown default_category: {} (expected all or a category name)",
                    self.report.default_category
                ),
            });
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the session snapshot path, resolving defaults if not set.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.storage
            .session_file
            .clone()
            .unwrap_or_else(|| self.data_dir().join(SESSION_FILE_NAME))
    }

    /// Get the catalog override path, if configured.
    #[must_use]
    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog.path.as_deref()
    }

    /// The report filter used when the command line gives none.
    ///
    /// Falls back to the built-in defaults for values that fail to
    /// parse; [`Config::validate`] has already rejected those at load.
    #[must_use]
    pub fn default_filter(&self) -> ReportFilter {
        ReportFilter::new(
            ReportRange::parse(&self.report.default_range).unwrap_or_default(),
            CategoryFilter::parse(&self.report.default_category).unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.data_dir.is_none());
        assert!(config.storage.session_file.is_none());
        assert!(config.catalog.path.is_none());
        assert_eq!(config.report.default_range, "month");
        assert_eq!(config.report.default_category, "all");
    }

    #[test]
    fn test_default_report_config() {
        let report = ReportConfig::default();

        assert_eq!(report.default_range, "month");
        assert_eq!(report.default_category, "all");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_range() {
        let mut config = Config::default();
        config.report.default_range = "decade".to_string();

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("default_range"));
    }

    #[test]
    fn test_validate_unknown_category() {
        let mut config = Config::default();
        config.report.default_category = "shopping".to_string();

        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("default_category"));
    }

    #[test]
    fn test_session_path_default() {
        let config = Config::default();
        let path = config.session_path();

        assert!(path.to_string_lossy().contains("ecotrack"));
        assert!(path.to_string_lossy().contains("session.json"));
    }

    #[test]
    fn test_session_path_custom() {
        let mut config = Config::default();
        config.storage.session_file = Some(PathBuf::from("/custom/path/state.json"));

        assert_eq!(
            config.session_path(),
            PathBuf::from("/custom/path/state.json")
        );
    }

    #[test]
    fn test_session_path_under_custom_data_dir() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/srv/ecotrack"));

        assert_eq!(
            config.session_path(),
            PathBuf::from("/srv/ecotrack/session.json")
        );
    }

    #[test]
    fn test_catalog_path() {
        let mut config = Config::default();
        assert!(config.catalog_path().is_none());

        config.catalog.path = Some(PathBuf::from("/etc/ecotrack/catalog.toml"));
        assert_eq!(
            config.catalog_path(),
            Some(Path::new("/etc/ecotrack/catalog.toml"))
        );
    }

    #[test]
    fn test_default_filter() {
        let mut config = Config::default();
        assert_eq!(config.default_filter(), ReportFilter::default());

        config.report.default_range = "week".to_string();
        config.report.default_category = "food".to_string();
        let filter = config.default_filter();
        assert_eq!(filter.range, ReportRange::Week);
        assert_eq!(
            filter.category,
            CategoryFilter::Only(crate::activity::Category::Food)
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("ecotrack"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_default_data_dir() {
        let path = Config::default_data_dir();
        assert!(path.to_string_lossy().contains("ecotrack"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "ecotrack_config_load_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[report]\ndefault_range = \"week\"\n\n[storage]\ndata_dir = \"/srv/ecotrack\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.report.default_range, "week");
        assert_eq!(config.report.default_category, "all");
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/srv/ecotrack")));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_invalid_range_in_file() {
        let path = std::env::temp_dir().join(format!(
            "ecotrack_config_invalid_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[report]\ndefault_range = \"decade\"\n").unwrap();

        let result = Config::load_from(Some(path.clone()));
        assert!(result.is_err());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        let cloned = config.clone();
        assert_eq!(config, cloned);
    }

    #[test]
    fn test_config_debug() {
        let config = Config::default();
        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("Config"));
    }

    #[test]
    fn test_storage_config_serialize() {
        let storage = StorageConfig::default();
        let json = serde_json::to_string(&storage).unwrap();
        assert!(json.contains("data_dir"));
    }

    #[test]
    fn test_report_config_deserialize() {
        let json = r#"{"default_range": "year"}"#;
        let report: ReportConfig = serde_json::from_str(json).unwrap();
        assert_eq!(report.default_range, "year");
        assert_eq!(report.default_category, "all");
    }
}
