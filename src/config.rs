/// Runtime configuration loaded from `jma_forecast.toml`.
///
/// The file is optional: every field has a default pointing at the public
/// JMA endpoints and a `weather.db` file in the working directory. A file
/// that exists but cannot be read or parsed is an error.

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "jma_forecast.toml";

const DEFAULT_AREA_URL: &str = "http://www.jma.go.jp/bosai/common/const/area.json";
const DEFAULT_FORECAST_BASE_URL: &str = "https://www.jma.go.jp/bosai/forecast/data/forecast";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Region directory document.
    pub area_url: String,
    /// Forecast documents live at `{forecast_base_url}/{code}.json`.
    pub forecast_base_url: String,
    /// SQLite file backing the forecast cache.
    pub cache_path: PathBuf,
    /// `tracing` filter directive, e.g. "info" or "jma_forecast=debug".
    pub log_level: String,
    /// When set, log lines go to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            area_url: DEFAULT_AREA_URL.to_string(),
            forecast_base_url: DEFAULT_FORECAST_BASE_URL.to_string(),
            cache_path: PathBuf::from("weather.db"),
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load("/nonexistent/jma_forecast.toml").expect("defaults");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_remaining_defaults() {
        let config = Config::from_toml(
            r#"
            cache_path = "/tmp/forecast.db"
            log_level = "debug"
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.cache_path, PathBuf::from("/tmp/forecast.db"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.area_url, DEFAULT_AREA_URL);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("jma_forecast.toml");
        std::fs::write(&path, "cache_path = [").expect("write");
        let result = Config::load(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })), "got {:?}", result);
    }
}
