use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::{
    config::Endpoints,
    error::PipelineError,
    model::{Coordinates, CurrentWeather, DailyEntry, Forecast, HourlyEntry},
    weather_code::WeatherCode,
};

use super::{AirQualitySource, ForecastSource, Geocoder};

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,wind_speed_10m,weather_code";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset";
const LOCAL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Client for the Open-Meteo geocoding, forecast and air-quality APIs.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    endpoints: Endpoints,
    http: Client,
}

impl OpenMeteoClient {
    pub fn new(endpoints: Endpoints, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { endpoints, http })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T, PipelineError> {
        debug!(url, ?query, "requesting {what}");

        let res = self.http.get(url).query(query).send().await.map_err(|e| {
            warn!(error = %e, "{what} request failed");
            PipelineError::fetch(format!("Failed to send {what} request: {e}"))
        })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| PipelineError::fetch(format!("Failed to read {what} response: {e}")))?;

        if !status.is_success() {
            warn!(%status, "{what} request returned an error status");
            return Err(PipelineError::fetch(format!(
                "{what} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| PipelineError::fetch(format!("Failed to parse {what} JSON: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Vec<GeoResult>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: u8,
    apparent_temperature: f64,
    wind_speed_10m: f64,
    weather_code: i32,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    weather_code: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    weather_code: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    sunrise: Vec<String>,
    sunset: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    #[serde(default)]
    utc_offset_seconds: i32,
    current: OmCurrent,
    hourly: OmHourly,
    daily: OmDaily,
}

#[derive(Debug, Deserialize)]
struct AqCurrent {
    us_aqi: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AqResponse {
    current: AqCurrent,
}

#[async_trait]
impl Geocoder for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn geocode(&self, name: &str) -> Result<Coordinates, PipelineError> {
        let url = format!("{}/search", self.endpoints.geocoding);
        let parsed: GeoResponse = self
            .get_json(
                &url,
                &[("name", name), ("count", "1"), ("language", "en"), ("format", "json")],
                "geocoding",
            )
            .await?;

        let first = parsed
            .results
            .first()
            .ok_or_else(|| PipelineError::NotFound(name.to_string()))?;

        debug!(lat = first.latitude, lon = first.longitude, "geocoded {name}");
        Ok(Coordinates::new(first.latitude, first.longitude))
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = coords.latitude, lon = coords.longitude))]
    async fn forecast(&self, coords: Coordinates) -> Result<Forecast, PipelineError> {
        let url = format!("{}/forecast", self.endpoints.forecast);
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();

        let parsed: OmForecastResponse = self
            .get_json(
                &url,
                &[
                    ("latitude", lat.as_str()),
                    ("longitude", lon.as_str()),
                    ("current", CURRENT_FIELDS),
                    ("hourly", HOURLY_FIELDS),
                    ("daily", DAILY_FIELDS),
                    ("timezone", "auto"),
                ],
                "forecast",
            )
            .await?;

        parse_forecast(parsed)
    }
}

#[async_trait]
impl AirQualitySource for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = coords.latitude, lon = coords.longitude))]
    async fn air_quality(&self, coords: Coordinates) -> Result<u32, PipelineError> {
        let url = format!("{}/air-quality", self.endpoints.air_quality);
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();

        let parsed: AqResponse = self
            .get_json(
                &url,
                &[
                    ("latitude", lat.as_str()),
                    ("longitude", lon.as_str()),
                    ("current", "us_aqi"),
                    ("timezone", "auto"),
                ],
                "air-quality",
            )
            .await?;

        let aqi = parsed
            .current
            .us_aqi
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| PipelineError::fetch("air-quality response has no us_aqi value"))?;

        Ok(aqi.round() as u32)
    }
}

fn parse_forecast(parsed: OmForecastResponse) -> Result<Forecast, PipelineError> {
    let offset = FixedOffset::east_opt(parsed.utc_offset_seconds).ok_or_else(|| {
        PipelineError::fetch(format!("Invalid utc_offset_seconds: {}", parsed.utc_offset_seconds))
    })?;

    let current = CurrentWeather {
        temperature_c: parsed.current.temperature_2m,
        humidity_pct: parsed.current.relative_humidity_2m,
        apparent_temperature_c: parsed.current.apparent_temperature,
        wind_speed_kmh: parsed.current.wind_speed_10m,
        weather_code: WeatherCode(parsed.current.weather_code),
    };

    let h = parsed.hourly;
    if h.temperature_2m.len() != h.time.len() || h.weather_code.len() != h.time.len() {
        return Err(PipelineError::fetch("hourly arrays have mismatched lengths"));
    }
    let hourly = h
        .time
        .iter()
        .zip(h.temperature_2m)
        .zip(h.weather_code)
        .map(|((time, temperature_c), code)| -> Result<HourlyEntry, PipelineError> {
            Ok(HourlyEntry {
                time: parse_local(time)?,
                temperature_c,
                weather_code: WeatherCode(code),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let d = parsed.daily;
    let n = d.time.len();
    if [
        d.weather_code.len(),
        d.temperature_2m_max.len(),
        d.temperature_2m_min.len(),
        d.sunrise.len(),
        d.sunset.len(),
    ]
    .iter()
    .any(|len| *len != n)
    {
        return Err(PipelineError::fetch("daily arrays have mismatched lengths"));
    }
    if n == 0 {
        return Err(PipelineError::fetch("forecast response contained no daily data"));
    }

    let mut daily = Vec::with_capacity(n);
    for i in 0..n {
        let date = NaiveDate::parse_from_str(&d.time[i], "%Y-%m-%d")
            .map_err(|e| PipelineError::fetch(format!("Invalid date '{}': {e}", d.time[i])))?;

        daily.push(DailyEntry {
            date,
            weather_code: WeatherCode(d.weather_code[i]),
            temperature_max_c: d.temperature_2m_max[i],
            temperature_min_c: d.temperature_2m_min[i],
            sunrise: attach_offset(&d.sunrise[i], offset)?,
            sunset: attach_offset(&d.sunset[i], offset)?,
        });
    }

    Ok(Forecast {
        current,
        hourly,
        daily,
    })
}

fn parse_local(s: &str) -> Result<NaiveDateTime, PipelineError> {
    NaiveDateTime::parse_from_str(s, LOCAL_TIME_FORMAT)
        .map_err(|e| PipelineError::fetch(format!("Invalid timestamp '{s}': {e}")))
}

/// Interpret a local Open-Meteo timestamp in the response's UTC offset.
fn attach_offset(s: &str, offset: FixedOffset) -> Result<DateTime<FixedOffset>, PipelineError> {
    let local = parse_local(s)?;
    offset
        .from_local_datetime(&local)
        .single()
        .ok_or_else(|| PipelineError::fetch(format!("Ambiguous local timestamp '{s}'")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn response(json: serde_json::Value) -> OmForecastResponse {
        serde_json::from_value(json).expect("fixture must deserialize")
    }

    fn fixture() -> serde_json::Value {
        serde_json::json!({
            "utc_offset_seconds": 7200,
            "current": {
                "temperature_2m": 22.0,
                "relative_humidity_2m": 40,
                "apparent_temperature": 21.4,
                "wind_speed_10m": 9.7,
                "weather_code": 0
            },
            "hourly": {
                "time": ["2024-06-01T00:00", "2024-06-01T01:00"],
                "temperature_2m": [15.2, 14.8],
                "weather_code": [0, 1]
            },
            "daily": {
                "time": ["2024-06-01", "2024-06-02"],
                "weather_code": [0, 61],
                "temperature_2m_max": [25.1, 19.0],
                "temperature_2m_min": [13.9, 12.2],
                "sunrise": ["2024-06-01T05:48", "2024-06-02T05:47"],
                "sunset": ["2024-06-01T21:47", "2024-06-02T21:48"]
            }
        })
    }

    #[test]
    fn parses_forecast_with_local_offset() {
        let forecast = parse_forecast(response(fixture())).expect("should parse");

        assert_eq!(forecast.current.humidity_pct, 40);
        assert_eq!(forecast.hourly.len(), 2);
        assert_eq!(forecast.hourly[1].time.hour(), 1);
        assert_eq!(forecast.hourly[1].weather_code, WeatherCode(1));

        let today = forecast.today().expect("daily entry 0");
        assert_eq!(today.sunrise.to_rfc3339(), "2024-06-01T05:48:00+02:00");
        assert_eq!(today.sunset.hour(), 21);
        assert_eq!(forecast.daily[1].weather_code, WeatherCode(61));
    }

    #[test]
    fn rejects_mismatched_hourly_arrays() {
        let mut json = fixture();
        json["hourly"]["weather_code"] = serde_json::json!([0]);

        let err = parse_forecast(response(json)).unwrap_err();
        assert!(matches!(err, PipelineError::Fetch(msg) if msg.contains("hourly")));
    }

    #[test]
    fn rejects_empty_daily_series() {
        let mut json = fixture();
        let keys = [
            "time",
            "weather_code",
            "temperature_2m_max",
            "temperature_2m_min",
            "sunrise",
            "sunset",
        ];
        for key in keys {
            json["daily"][key] = serde_json::json!([]);
        }

        let err = parse_forecast(response(json)).unwrap_err();
        assert!(matches!(err, PipelineError::Fetch(msg) if msg.contains("no daily data")));
    }

    #[test]
    fn rejects_bad_timestamps() {
        let mut json = fixture();
        json["daily"]["sunrise"] = serde_json::json!(["sometime", "2024-06-02T05:47"]);

        assert!(parse_forecast(response(json)).is_err());
    }

    #[test]
    fn truncates_long_bodies() {
        let body = "x".repeat(500);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let body = "é".repeat(300);
        assert!(truncate_body(&body).ends_with("..."));
    }
}
