use crate::{
    Config,
    error::PipelineError,
    model::{Coordinates, Forecast},
    provider::open_meteo::OpenMeteoClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

/// Resolves a place name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// First match for `name`, or [`PipelineError::NotFound`].
    async fn geocode(&self, name: &str) -> Result<Coordinates, PipelineError>;
}

/// Current, hourly and daily weather for a position, in one call.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn forecast(&self, coords: Coordinates) -> Result<Forecast, PipelineError>;
}

/// Current air-quality index for a position.
#[async_trait]
pub trait AirQualitySource: Send + Sync + Debug {
    async fn air_quality(&self, coords: Coordinates) -> Result<u32, PipelineError>;
}

/// Construct the Open-Meteo client from config endpoints and timeout.
pub fn client_from_config(config: &Config) -> anyhow::Result<OpenMeteoClient> {
    OpenMeteoClient::new(config.endpoints.clone(), config.timeout())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config() {
        let cfg = Config::default();
        let client = client_from_config(&cfg);
        assert!(client.is_ok());
    }

    #[test]
    fn client_from_config_with_timeout() {
        let cfg = Config {
            timeout_secs: Some(5),
            ..Config::default()
        };
        assert!(client_from_config(&cfg).is_ok());
    }
}
