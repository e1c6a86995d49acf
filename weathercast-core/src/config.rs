use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::model::Coordinates;

/// Base URLs of the upstream APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocoding: String,
    pub forecast: String,
    pub air_quality: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding: "https://geocoding-api.open-meteo.com/v1".to_string(),
            forecast: "https://api.open-meteo.com/v1".to_string(),
            air_quality: "https://air-quality-api.open-meteo.com/v1".to_string(),
        }
    }
}

impl Endpoints {
    /// Point all three APIs at one base URL (used with mock servers).
    pub fn single(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            geocoding: base.clone(),
            forecast: base.clone(),
            air_quality: base,
        }
    }
}

/// Position this device reports for "current location" requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub position: Option<Coordinates>,

    /// Whether the user allowed the position to be used.
    #[serde(default)]
    pub allow_location: bool,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// timeout_secs = 10
///
/// [endpoints]
/// forecast = "https://api.open-meteo.com/v1"
///
/// [device]
/// allow_location = true
/// position = { latitude = 48.85, longitude = 2.35 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Optional HTTP timeout. Unset means requests wait indefinitely.
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub endpoints: Endpoints,

    #[serde(default)]
    pub device: DeviceConfig,
}

impl Config {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
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
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weathercast", "weathercast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Record the device position and whether it may be used.
    pub fn set_device_position(&mut self, position: Option<Coordinates>, allow: bool) {
        self.device.position = position;
        self.device.allow_location = allow;
    }
}
