use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    assemble::assemble,
    daylight,
    error::PipelineError,
    model::{Coordinates, Location, ViewModel},
    provider::{AirQualitySource, ForecastSource, Geocoder, open_meteo::OpenMeteoClient},
};

/// Where a single request stands.
///
/// `Idle → Resolving → Fetching → Ready | Failed`; `Resolving` is skipped
/// when the location already carries coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    Idle,
    Resolving(Location),
    Fetching(Coordinates),
    Ready(Arc<ViewModel>),
    Failed(PipelineError),
}

impl PipelineState {
    pub fn is_loading(&self) -> bool {
        matches!(self, PipelineState::Resolving(_) | PipelineState::Fetching(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Ready(_) | PipelineState::Failed(_))
    }
}

/// Geocode, fetch forecast and air quality, classify day/night, assemble.
#[derive(Debug, Clone)]
pub struct Pipeline {
    geocoder: Arc<dyn Geocoder>,
    forecast: Arc<dyn ForecastSource>,
    air_quality: Arc<dyn AirQualitySource>,
    clock: fn() -> DateTime<Utc>,
}

impl Pipeline {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        forecast: Arc<dyn ForecastSource>,
        air_quality: Arc<dyn AirQualitySource>,
    ) -> Self {
        Self {
            geocoder,
            forecast,
            air_quality,
            clock: Utc::now,
        }
    }

    pub fn open_meteo(client: OpenMeteoClient) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client.clone(), client)
    }

    /// Replace the source of "now" used for the day/night decision.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn run(&self, location: Location) -> Result<Arc<ViewModel>, PipelineError> {
        self.run_observed(location, |_| {}).await
    }

    /// Run one request, reporting every state transition to `observe`.
    ///
    /// The last state reported is always `Ready` or `Failed`.
    pub async fn run_observed<F>(
        &self,
        location: Location,
        mut observe: F,
    ) -> Result<Arc<ViewModel>, PipelineError>
    where
        F: FnMut(&PipelineState) + Send,
    {
        let result = self.execute(location, &mut observe).await.map(Arc::new);

        match &result {
            Ok(vm) => {
                debug!(location = %vm.location, is_day = vm.is_day, "view model ready");
                observe(&PipelineState::Ready(vm.clone()));
            }
            Err(err) => {
                warn!(error = %err, "weather request failed");
                observe(&PipelineState::Failed(err.clone()));
            }
        }

        result
    }

    async fn execute<F>(
        &self,
        location: Location,
        observe: &mut F,
    ) -> Result<ViewModel, PipelineError>
    where
        F: FnMut(&PipelineState) + Send,
    {
        let coords = match location.coordinates() {
            Some(coords) => coords,
            None => {
                observe(&PipelineState::Resolving(location.clone()));
                self.geocoder.geocode(location.label()).await?
            }
        };

        observe(&PipelineState::Fetching(coords));
        let (forecast, aqi) = tokio::try_join!(
            self.forecast.forecast(coords),
            self.air_quality.air_quality(coords),
        )?;

        let now = (self.clock)();
        let today = forecast
            .today()
            .ok_or_else(|| PipelineError::fetch("forecast response contained no daily data"))?;
        let is_day = daylight::is_day(&today.sunrise, &today.sunset, &now);

        Ok(assemble(location.label(), forecast, aqi, is_day))
    }
}
