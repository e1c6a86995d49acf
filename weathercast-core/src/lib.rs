//! Core library for the `weathercast` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The Open-Meteo geocoding, forecast and air-quality clients
//! - The request pipeline that turns a location into a [`ViewModel`]
//! - Weather-code classification used by renderers
//!
//! It is used by `weathercast-cli`, but can also back other front-ends.

pub mod assemble;
pub mod config;
pub mod daylight;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod session;
pub mod weather_code;

#[cfg(test)]
mod testing;

pub use config::{Config, DeviceConfig, Endpoints};
pub use error::{GeolocationError, PipelineError};
pub use geolocation::{ConfiguredPosition, PositionSource};
pub use model::{
    Coordinates, CurrentConditions, DailyEntry, Forecast, HourlyEntry, Location, ViewModel,
};
pub use pipeline::{Pipeline, PipelineState};
pub use provider::{AirQualitySource, ForecastSource, Geocoder, open_meteo::OpenMeteoClient};
pub use session::{Session, Submission};
pub use weather_code::{Background, WeatherCode};

/// Read the device position and turn it into a "current location" request.
pub async fn locate(source: &dyn PositionSource) -> Result<Location, PipelineError> {
    let coords = source.current_position().await?;
    Ok(Location::current(coords))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn locate_maps_geolocation_failures() {
        let err = locate(&ConfiguredPosition::default()).await.unwrap_err();
        assert_eq!(err, PipelineError::GeolocationUnavailable(GeolocationError::Unsupported));
    }

    #[tokio::test]
    async fn locate_builds_current_location() {
        let source = ConfiguredPosition::new(DeviceConfig {
            position: Some(Coordinates::new(40.71, -74.0)),
            allow_location: true,
        });
        let location = locate(&source).await.expect("position available");
        assert_eq!(location.label(), "Current Location");
    }
}
