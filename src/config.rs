//! Dashboard Configuration
//! Optional JSON file naming the two data sources and the initial selection.

use crate::data::{is_supported_year, DataSource, FIRST_YEAR};
use crate::view::{DashboardMode, PipelineError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "ct-housing-dashboard.json";
/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "CT_DASHBOARD_CONFIG";

pub const DEFAULT_DATA_SOURCE: &str =
    "https://raw.githubusercontent.com/khroneski/DSC205_InequalityAndHousing/main/housing_and_income.csv";
pub const DEFAULT_GEOMETRY_SOURCE: &str = "https://gist.githubusercontent.com/ilyankou/203ae1cb0cd852161d97ebfdc6d62db4/raw/d4e803234ec0e488102988637de8aad4d95042df/ct-town-boundaries.geojson";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid default mode: {0}")]
    Mode(#[from] PipelineError),
    #[error("Default year {0} is outside 2011-2020")]
    YearOutOfRange(i32),
    #[error("Request timeout must be at least one second")]
    ZeroTimeout,
}

/// The config file as written.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default)]
    pub geometry_source: Option<String>,
    #[serde(default)]
    pub default_mode: Option<String>,
    #[serde(default)]
    pub default_year: Option<i32>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Validated configuration with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_source: DataSource,
    pub geometry_source: DataSource,
    pub default_mode: DashboardMode,
    pub default_year: i32,
    pub request_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_source: DataSource::from(DEFAULT_DATA_SOURCE),
            geometry_source: DataSource::from(DEFAULT_GEOMETRY_SOURCE),
            default_mode: DashboardMode::default(),
            default_year: FIRST_YEAR,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `path` if given, else the default file if present, else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<DashboardConfig, ConfigError> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            log::debug!("No {DEFAULT_CONFIG_FILE}, using defaults");
            return Self::resolve_config(Config::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        let config: Config =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: config_path.clone(),
                source,
            })?;

        log::info!("Using config {}", config_path.display());
        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<DashboardConfig, ConfigError> {
        let defaults = DashboardConfig::default();

        let default_mode = match config.default_mode.as_deref() {
            Some(mode) => DashboardMode::parse(mode)?,
            None => defaults.default_mode,
        };

        let default_year = config.default_year.unwrap_or(defaults.default_year);
        if !is_supported_year(default_year) {
            return Err(ConfigError::YearOutOfRange(default_year));
        }

        let request_timeout = match config.request_timeout_secs {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(secs) => Duration::from_secs(secs),
            None => defaults.request_timeout,
        };

        Ok(DashboardConfig {
            data_source: config
                .data_source
                .as_deref()
                .map(DataSource::from)
                .unwrap_or(defaults.data_source),
            geometry_source: config
                .geometry_source
                .as_deref()
                .map(DataSource::from)
                .unwrap_or(defaults.geometry_source),
            default_mode,
            default_year,
            request_timeout,
        })
    }
}
