use thiserror::Error;

/// Why a device position could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    /// No position source is available on this device.
    #[error("geolocation is not supported on this device")]
    Unsupported,

    /// A position source exists but the user did not allow access to it.
    #[error("location access was denied")]
    PermissionDenied,

    /// Access was allowed but no position could be read.
    #[error("the device position is unavailable")]
    PositionUnavailable,
}

/// Terminal failure of a single weather request.
///
/// Every variant ends the request; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The geocoder returned no match for the place name.
    #[error("no location found for '{0}'")]
    NotFound(String),

    /// Any upstream HTTP, network or decoding failure.
    #[error("{0}")]
    Fetch(String),

    /// The device position could not be read.
    #[error("geolocation unavailable: {0}")]
    GeolocationUnavailable(#[from] GeolocationError),
}

impl PipelineError {
    pub(crate) fn fetch(message: impl Into<String>) -> Self {
        PipelineError::Fetch(message.into())
    }

    /// Message suitable for showing to the user.
    ///
    /// All fetch failures map to the same text; the detail is in `Display`.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::NotFound(name) => format!("City not found: {name}"),
            PipelineError::Fetch(_) => {
                "Failed to fetch weather data. Please try again.".to_string()
            }
            PipelineError::GeolocationUnavailable(GeolocationError::Unsupported) => {
                "Geolocation is not supported on this device. Search by city name instead, \
                 or run `weathercast configure` to set a device position."
                    .to_string()
            }
            PipelineError::GeolocationUnavailable(_) => {
                "Unable to get your location. Please allow location access or search by city name."
                    .to_string()
            }
        }
    }
}
