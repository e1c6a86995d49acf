//! WMO weather codes as reported by Open-Meteo, and their mapping to
//! descriptions, icons and background themes.
//!
//! Every mapping is total: codes outside the known tables fall back to
//! "clear".

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherCode(pub i32);

/// Coarse sky condition used to pick a background theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sky {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Thunderstorm,
}

/// Background theme shown behind the current conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Background {
    ClearDay,
    ClearNight,
    CloudyDay,
    CloudyNight,
    Rainy,
    Snow,
    Storm,
}

impl Background {
    pub fn as_str(&self) -> &'static str {
        match self {
            Background::ClearDay => "bg-clear-day",
            Background::ClearNight => "bg-clear-night",
            Background::CloudyDay => "bg-cloudy-day",
            Background::CloudyNight => "bg-cloudy-night",
            Background::Rainy => "bg-rainy",
            Background::Snow => "bg-snow",
            Background::Storm => "bg-storm",
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl WeatherCode {
    pub fn sky(self) -> Sky {
        match self.0 {
            0 => Sky::Clear,
            1..=3 => Sky::Cloudy,
            51..=65 | 80..=82 => Sky::Rain,
            71..=77 => Sky::Snow,
            95 | 96 | 99 => Sky::Thunderstorm,
            _ => Sky::Clear,
        }
    }

    pub fn background(self, is_day: bool) -> Background {
        match (self.sky(), is_day) {
            (Sky::Clear, true) => Background::ClearDay,
            (Sky::Clear, false) => Background::ClearNight,
            (Sky::Cloudy, true) => Background::CloudyDay,
            (Sky::Cloudy, false) => Background::CloudyNight,
            (Sky::Rain, _) => Background::Rainy,
            (Sky::Snow, _) => Background::Snow,
            (Sky::Thunderstorm, _) => Background::Storm,
        }
    }

    /// Short human-readable description.
    ///
    /// A clear sky reads "Sunny" by day and "Clear" at night.
    pub fn description(self, is_day: bool) -> &'static str {
        match self.0 {
            0 if is_day => "Sunny",
            0 => "Clear",
            1 => "Mainly clear",
            2 => "Partly cloudy",
            3 => "Cloudy",
            45 | 48 => "Foggy",
            51 | 56 | 61 | 80 => "Light rain",
            53 | 57 | 63 | 81 => "Rainy",
            55 | 65 | 82 => "Heavy rain",
            71 => "Light snow",
            73 | 77 => "Snowy",
            75 => "Heavy snow",
            95 | 96 | 99 => "Storm",
            _ => "Clear",
        }
    }

    pub fn icon(self, is_day: bool) -> &'static str {
        match self.0 {
            0 | 1 if !is_day => "🌙",
            2 if !is_day => "☁️",
            0 => "☀️",
            1 => "🌤️",
            2 => "⛅",
            3 => "☁️",
            45 | 48 => "🌫️",
            51 | 53 | 55..=57 | 61 | 63 | 65 | 80..=82 => "🌧️",
            71 | 73 | 75 | 77 => "🌨️",
            95 | 96 | 99 => "⛈️",
            _ if is_day => "☀️",
            _ => "🌙",
        }
    }
}

impl From<i32> for WeatherCode {
    fn from(code: i32) -> Self {
        WeatherCode(code)
    }
}
