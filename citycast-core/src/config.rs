use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    city::CitySource,
    curve::{CurveBuilder, DEFAULT_SCALE},
    fetch::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT},
    parser::ForecastParser,
};

/// Accepted range for `curve.height`.
pub const HEIGHT_RANGE: std::ops::RangeInclusive<u16> = 1..=200;
/// Accepted range for `curve.column_width`.
pub const COLUMN_WIDTH_RANGE: std::ops::RangeInclusive<u16> = 1..=80;

/// Terminal chart sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Vertical units per degree Celsius.
    pub scale: f64,
    /// Rows per curve.
    pub height: u16,
    /// Columns per day.
    pub column_width: u16,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self { scale: DEFAULT_SCALE, height: 12, column_width: 10 }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// base_url = "http://t.weather.itboy.net/api/weather/city"
/// default_city = "北京"
/// city_index = "/usr/share/citycast/citycode.json"
///
/// [curve]
/// scale = 1.2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub default_city: Option<String>,
    /// City index file; the bundled major-city dataset is used when unset.
    pub city_index: Option<PathBuf>,
    /// Default malformed temperatures to 0 instead of rejecting the payload.
    pub lenient_temperatures: bool,
    pub request_timeout_secs: u64,
    pub curve: CurveConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_city: None,
            city_index: None,
            lenient_temperatures: false,
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            curve: CurveConfig::default(),
        }
    }
}

impl Config {
    pub fn default_city(&self) -> Result<&str> {
        self.default_city.as_deref().filter(|c| !c.trim().is_empty()).ok_or_else(|| {
            anyhow!(
                "No city given and no default city configured.\n\
                 Hint: pass a city name or run `citycast configure` first."
            )
        })
    }

    pub fn set_default_city(&mut self, city: impl Into<String>) {
        self.default_city = Some(city.into());
    }

    pub fn city_source(&self) -> CitySource {
        match &self.city_index {
            Some(path) => CitySource::File(path.clone()),
            None => CitySource::Bundled,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn curve_builder(&self) -> CurveBuilder {
        CurveBuilder::new(self.curve.scale)
    }

    pub fn parser(&self) -> ForecastParser {
        ForecastParser::new(self.lenient_temperatures)
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        if !(cfg.curve.scale.is_finite() && cfg.curve.scale > 0.0) {
            return Err(anyhow!("curve.scale must be a positive number, got {}", cfg.curve.scale));
        }
        if !HEIGHT_RANGE.contains(&cfg.curve.height) {
            return Err(anyhow!(
                "curve.height must be between {} and {}, got {}",
                HEIGHT_RANGE.start(),
                HEIGHT_RANGE.end(),
                cfg.curve.height
            ));
        }
        if !COLUMN_WIDTH_RANGE.contains(&cfg.curve.column_width) {
            return Err(anyhow!(
                "curve.column_width must be between {} and {}, got {}",
                COLUMN_WIDTH_RANGE.start(),
                COLUMN_WIDTH_RANGE.end(),
                cfg.curve.column_width
            ));
        }
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "citycast", "citycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
