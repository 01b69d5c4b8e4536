//! Dashboard Configuration Module
//! Data directory, per-year file pattern and the list of years shown as tabs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "FREIGHT_DASHBOARD_CONFIG";
/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "freight_dashboard.json";

const YEAR_PLACEHOLDER: &str = "{year}";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("File pattern must contain {{year}}: {0}")]
    InvalidPattern(String),
    #[error("At least one year must be configured")]
    NoYears,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub file_pattern: String,
    pub years: Vec<i32>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            file_pattern: format!("{YEAR_PLACEHOLDER}_TransData.csv"),
            years: vec![2020, 2021, 2022, 2023, 2024],
        }
    }
}

impl DashboardConfig {
    /// Resolve configuration from the environment variable, then the default
    /// file in the working directory, falling back to built-in defaults.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            return Self::from_file(default_path);
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Parse and validate a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        tracing::info!(path = %path.display(), years = ?config.years, "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.file_pattern.contains(YEAR_PLACEHOLDER) {
            return Err(ConfigError::InvalidPattern(self.file_pattern.clone()));
        }
        if self.years.is_empty() {
            return Err(ConfigError::NoYears);
        }
        Ok(())
    }

    /// Path of the CSV file holding one year's transactions.
    pub fn file_for_year(&self, year: i32) -> PathBuf {
        self.data_dir
            .join(self.file_pattern.replace(YEAR_PLACEHOLDER, &year.to_string()))
    }

    /// Human readable span of the configured years, e.g. "2020–2024".
    pub fn year_span(&self) -> String {
        match (self.years.iter().min(), self.years.iter().max()) {
            (Some(first), Some(last)) if first != last => format!("{first}–{last}"),
            (Some(first), _) => first.to_string(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_cover_five_years() {
        let config = DashboardConfig::default();
        assert_eq!(config.years, vec![2020, 2021, 2022, 2023, 2024]);
        assert_eq!(
            config.file_for_year(2022),
            PathBuf::from(".").join("2022_TransData.csv")
        );
        assert_eq!(config.year_span(), "2020–2024");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "data_dir": "/srv/freight" }}"#).unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/freight"));
        assert_eq!(config.years, DashboardConfig::default().years);
    }

    #[test]
    fn pattern_without_placeholder_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "file_pattern": "freight.csv" }}"#).unwrap();

        let err = DashboardConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern(_)));
    }

    #[test]
    fn empty_year_list_is_rejected() {
        let config = DashboardConfig {
            years: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoYears)));
    }

    #[test]
    fn single_year_span() {
        let config = DashboardConfig {
            years: vec![2023],
            ..Default::default()
        };
        assert_eq!(config.year_span(), "2023");
    }
}
