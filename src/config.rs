//! Dashboard Configuration
//! Optional JSON settings file; every field falls back to its default.

use crate::stats::ForecastParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "sea_the_truth.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub chart_width: u32,
    pub chart_height: u32,
    pub deck_title: String,
    /// Open the deck in the system viewer after export.
    pub open_after_export: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            chart_width: 1400,
            chart_height: 1000,
            deck_title: "Sea The Truth Report".to_string(),
            open_after_export: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory holding the CSV sources.
    pub data_dir: PathBuf,
    pub forecast: ForecastParams,
    pub export: ExportSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            forecast: ForecastParams::default(),
            export: ExportSettings::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Read `path` if it exists. A missing file means defaults; a broken one is
    /// logged and also means defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_forecast() {
        let config = DashboardConfig::default();
        assert_eq!(config.forecast.growth_rate, 0.08);
        assert_eq!(config.forecast.uncertainty_step, 0.05);
        assert_eq!(config.forecast.horizon_year, 2035);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config =
            DashboardConfig::from_json(r#"{"data_dir": "/srv/csv", "forecast": {"horizon_year": 2030}}"#)
                .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/csv"));
        assert_eq!(config.forecast.horizon_year, 2030);
        assert_eq!(config.forecast.growth_rate, 0.08);
        assert_eq!(config.export, ExportSettings::default());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            DashboardConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("sea_the_truth_absent_config.json");
        assert_eq!(DashboardConfig::load_or_default(&path), DashboardConfig::default());
    }
}
