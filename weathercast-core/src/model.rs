use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{
    error::{GeolocationError, PipelineError},
    weather_code::{Background, WeatherCode},
};

/// Label used for requests made from the device position.
pub const CURRENT_LOCATION_LABEL: &str = "Current Location";

/// Route token that selects the device position instead of a city name.
pub const CURRENT_ROUTE_TOKEN: &str = "current";

/// Number of hourly entries kept in a view model.
pub const HOURLY_LIMIT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both values finite, latitude within ±90 and longitude within ±180.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// What the user asked for: a place name or a known position.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Named(String),
    Current(Coordinates),
}

impl Location {
    /// Location from a search string. Blank input yields `None`.
    pub fn named(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        (!trimmed.is_empty()).then(|| Location::Named(trimmed.to_string()))
    }

    pub fn current(coords: Coordinates) -> Self {
        Location::Current(coords)
    }

    /// Parse the navigation surface: a route segment holding a city name or
    /// the `current` token, with `lat`/`lon` parameters for the latter.
    ///
    /// Missing or out-of-range coordinates for `current` are reported as an
    /// unavailable position.
    pub fn from_route(
        segment: &str,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Result<Self, PipelineError> {
        if segment.trim() == CURRENT_ROUTE_TOKEN {
            return match (lat, lon) {
                (Some(lat), Some(lon)) if Coordinates::new(lat, lon).is_valid() => {
                    Ok(Location::current(Coordinates::new(lat, lon)))
                }
                _ => Err(GeolocationError::PositionUnavailable.into()),
            };
        }

        Location::named(segment).ok_or_else(|| PipelineError::NotFound(segment.to_string()))
    }

    /// Text shown as the location heading.
    pub fn label(&self) -> &str {
        match self {
            Location::Named(name) => name,
            Location::Current(_) => CURRENT_LOCATION_LABEL,
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Location::Named(_) => None,
            Location::Current(coords) => Some(*coords),
        }
    }
}

/// Current conditions as returned by the forecast endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub apparent_temperature_c: f64,
    pub wind_speed_kmh: f64,
    pub weather_code: WeatherCode,
}

/// Current weather joined with the air-quality index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub apparent_temperature_c: f64,
    pub wind_speed_kmh: f64,
    pub weather_code: WeatherCode,
    pub aqi: u32,
}

impl CurrentConditions {
    pub fn new(weather: CurrentWeather, aqi: u32) -> Self {
        Self {
            temperature_c: weather.temperature_c,
            humidity_pct: weather.humidity_pct,
            apparent_temperature_c: weather.apparent_temperature_c,
            wind_speed_kmh: weather.wind_speed_kmh,
            weather_code: weather.weather_code,
            aqi,
        }
    }
}

/// One hour of the hourly series, in the location's local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub time: NaiveDateTime,
    pub temperature_c: f64,
    pub weather_code: WeatherCode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub weather_code: WeatherCode,
    pub temperature_max_c: f64,
    pub temperature_min_c: f64,
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
}

/// Everything the forecast endpoint returns for one position.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub current: CurrentWeather,
    pub hourly: Vec<HourlyEntry>,
    pub daily: Vec<DailyEntry>,
}

impl Forecast {
    /// Daily entry 0.
    pub fn today(&self) -> Option<&DailyEntry> {
        self.daily.first()
    }
}

/// Rendering-ready result of one request. Never mutated after assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub location: String,
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyEntry>,
    pub daily: Vec<DailyEntry>,
    pub is_day: bool,
}

impl ViewModel {
    pub fn description(&self) -> &'static str {
        self.current.weather_code.description(self.is_day)
    }

    pub fn icon(&self) -> &'static str {
        self.current.weather_code.icon(self.is_day)
    }

    pub fn background(&self) -> Background {
        self.current.weather_code.background(self.is_day)
    }
}
