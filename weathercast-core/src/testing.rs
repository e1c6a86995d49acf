//! In-memory upstream sources for pipeline and session tests.

use async_trait::async_trait;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::sync::Notify;

use crate::{
    assemble::tests::sample_forecast,
    error::PipelineError,
    model::{Coordinates, Forecast},
    provider::{AirQualitySource, ForecastSource, Geocoder},
};

#[derive(Debug, Default)]
pub(crate) struct Calls {
    pub geocode: AtomicUsize,
    pub forecast: AtomicUsize,
    pub air_quality: AtomicUsize,
}

impl Calls {
    pub fn geocode(&self) -> usize {
        self.geocode.load(Ordering::SeqCst)
    }

    pub fn forecast(&self) -> usize {
        self.forecast.load(Ordering::SeqCst)
    }

    pub fn air_quality(&self) -> usize {
        self.air_quality.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub(crate) struct FakeUpstream {
    pub geocoded: Option<Coordinates>,
    pub forecast: Result<Forecast, PipelineError>,
    pub aqi: Result<u32, PipelineError>,
    /// Forecast requests for this latitude wait until notified.
    pub gate: Option<(f64, Arc<Notify>)>,
    pub calls: Arc<Calls>,
}

impl Default for FakeUpstream {
    fn default() -> Self {
        Self {
            geocoded: Some(Coordinates::new(48.85, 2.35)),
            forecast: Ok(sample_forecast(24)),
            aqi: Ok(42),
            gate: None,
            calls: Arc::default(),
        }
    }
}

#[async_trait]
impl Geocoder for FakeUpstream {
    async fn geocode(&self, name: &str) -> Result<Coordinates, PipelineError> {
        self.calls.geocode.fetch_add(1, Ordering::SeqCst);
        self.geocoded.ok_or_else(|| PipelineError::NotFound(name.to_string()))
    }
}

#[async_trait]
impl ForecastSource for FakeUpstream {
    async fn forecast(&self, coords: Coordinates) -> Result<Forecast, PipelineError> {
        self.calls.forecast.fetch_add(1, Ordering::SeqCst);
        if let Some((lat, gate)) = &self.gate {
            if *lat == coords.latitude {
                gate.notified().await;
            }
        }
        self.forecast.clone()
    }
}

#[async_trait]
impl AirQualitySource for FakeUpstream {
    async fn air_quality(&self, _coords: Coordinates) -> Result<u32, PipelineError> {
        self.calls.air_quality.fetch_add(1, Ordering::SeqCst);
        self.aqi.clone()
    }
}
