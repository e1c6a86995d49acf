//! Device position as a single awaited reading.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{config::DeviceConfig, error::GeolocationError, model::Coordinates};

/// Source of one device position reading.
#[async_trait]
pub trait PositionSource: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Position taken from the user's configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredPosition {
    device: DeviceConfig,
}

impl ConfiguredPosition {
    pub fn new(device: DeviceConfig) -> Self {
        Self { device }
    }
}

#[async_trait]
impl PositionSource for ConfiguredPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        match (&self.device.position, self.device.allow_location) {
            (None, _) => Err(GeolocationError::Unsupported),
            (Some(_), false) => Err(GeolocationError::PermissionDenied),
            (Some(coords), true) if coords.is_valid() => Ok(*coords),
            (Some(_), true) => Err(GeolocationError::PositionUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(position: Option<Coordinates>, allow_location: bool) -> ConfiguredPosition {
        ConfiguredPosition::new(DeviceConfig {
            position,
            allow_location,
        })
    }

    #[tokio::test]
    async fn no_position_is_unsupported() {
        let err = device(None, true).current_position().await.unwrap_err();
        assert_eq!(err, GeolocationError::Unsupported);
    }

    #[tokio::test]
    async fn position_without_permission_is_denied() {
        let err = device(Some(Coordinates::new(1.0, 2.0)), false)
            .current_position()
            .await
            .unwrap_err();
        assert_eq!(err, GeolocationError::PermissionDenied);
    }

    #[tokio::test]
    async fn allowed_position_is_returned() {
        let coords = device(Some(Coordinates::new(48.85, 2.35)), true)
            .current_position()
            .await
            .expect("position must be available");
        assert_eq!(coords, Coordinates::new(48.85, 2.35));
    }

    #[tokio::test]
    async fn non_finite_position_is_unavailable() {
        let err = device(Some(Coordinates::new(f64::NAN, 2.35)), true)
            .current_position()
            .await
            .unwrap_err();
        assert_eq!(err, GeolocationError::PositionUnavailable);
    }

    #[tokio::test]
    async fn out_of_range_position_is_unavailable() {
        let err = device(Some(Coordinates::new(500.0, 2.35)), true)
            .current_position()
            .await
            .unwrap_err();
        assert_eq!(err, GeolocationError::PositionUnavailable);
    }
}
