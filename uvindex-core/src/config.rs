use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::Location;

pub const DEFAULT_API_BASE: &str = "https://currentuvindex.com";
pub const DEFAULT_UPDATE_INTERVAL_MINUTES: u32 = 30;

/// The host's own configured location, used when the entry does not pin one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeConfig {
    pub latitude: f64,
    pub longitude: f64,
}

/// Setup data for this integration. Every field falls back to something sensible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Scope for reading ids; derived from the coordinates when absent.
    pub entry_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Minutes between refreshes.
    pub update_interval: Option<u32>,
}

/// User options. These win over the setup data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryOptions {
    pub update_interval: Option<u32>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [home]
/// latitude = 59.3293
/// longitude = 18.0686
///
/// [entry]
/// update_interval = 30
///
/// [options]
/// update_interval = 15
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    pub home: HomeConfig,

    #[serde(default)]
    pub entry: EntryConfig,

    #[serde(default)]
    pub options: EntryOptions,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Config {
    /// Configuration that polls the host location with every default.
    pub fn for_home(latitude: f64, longitude: f64) -> Self {
        Self {
            api_base: default_api_base(),
            home: HomeConfig { latitude, longitude },
            entry: EntryConfig::default(),
            options: EntryOptions::default(),
        }
    }

    /// Load config from the platform config directory.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Err(anyhow!(
                "No config file found at {}.\n\
                 Hint: create it with a [home] section holding latitude and longitude.",
                path.display()
            ));
        }

        Self::load_from(&path)
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "uvindex", "uvindex")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn latitude(&self) -> f64 {
        self.entry.latitude.unwrap_or(self.home.latitude)
    }

    pub fn longitude(&self) -> f64 {
        self.entry.longitude.unwrap_or(self.home.longitude)
    }

    pub fn location(&self) -> Location {
        Location {
            latitude: self.latitude(),
            longitude: self.longitude(),
        }
    }

    /// Options first, then setup data, then the default.
    pub fn update_interval_minutes(&self) -> u32 {
        self.options
            .update_interval
            .or(self.entry.update_interval)
            .unwrap_or(DEFAULT_UPDATE_INTERVAL_MINUTES)
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.update_interval_minutes()) * 60)
    }

    pub fn entry_id(&self) -> String {
        match self.entry.entry_id.as_deref() {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => format!("{:.4}_{:.4}", self.latitude(), self.longitude()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let lat = self.latitude();
        if !(-90.0..=90.0).contains(&lat) {
            bail!("latitude {lat} is out of range (-90..=90)");
        }

        let lon = self.longitude();
        if !(-180.0..=180.0).contains(&lon) {
            bail!("longitude {lon} is out of range (-180..=180)");
        }

        if self.update_interval_minutes() == 0 {
            bail!("update_interval must be at least 1 minute");
        }

        if self.api_base.trim().is_empty() {
            bail!("api_base must not be empty");
        }

        Ok(())
    }
}
