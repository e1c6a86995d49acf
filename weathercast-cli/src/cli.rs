use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, validator::Validation};
use weathercast_core::{
    Config, ConfiguredPosition, Coordinates, Location, Pipeline, PipelineError, PipelineState,
    Session, Submission, locate, model::CURRENT_ROUTE_TOKEN, provider::client_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weathercast",
    version,
    about = "Weather and air quality for a city or your position"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the device position used for `show current`.
    Configure,

    /// Show weather for a city, or for `current` to use the device position.
    Show {
        /// City name, or the literal `current`.
        #[arg(value_parser = non_blank)]
        place: String,

        /// Latitude for `current`; overrides the configured position.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude for `current`; overrides the configured position.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Print the view model as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the path of the configuration file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                place,
                lat,
                lon,
                json,
            } => show(&place, lat, lon, json).await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let latitude = CustomType::<f64>::new("Device latitude:")
        .with_error_message("Please enter a number between -90 and 90")
        .with_validator(|v: &f64| {
            Ok(if (-90.0..=90.0).contains(v) {
                Validation::Valid
            } else {
                Validation::Invalid("latitude must be -90 to 90".into())
            })
        })
        .prompt()
        .context("Failed to read latitude")?;

    let longitude = CustomType::<f64>::new("Device longitude:")
        .with_error_message("Please enter a number between -180 and 180")
        .with_validator(|v: &f64| {
            Ok(if (-180.0..=180.0).contains(v) {
                Validation::Valid
            } else {
                Validation::Invalid("longitude must be -180 to 180".into())
            })
        })
        .prompt()
        .context("Failed to read longitude")?;

    let allow = Confirm::new("Allow weathercast to use this position?")
        .with_default(true)
        .prompt()
        .context("Failed to read confirmation")?;

    cfg.set_device_position(Some(Coordinates::new(latitude, longitude)), allow);
    cfg.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(place: &str, lat: Option<f64>, lon: Option<f64>, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load()?;

    let location = match resolve_location(&cfg, place, lat, lon).await {
        Ok(location) => location,
        Err(err) => bail!(err.user_message()),
    };
    tracing::debug!(?location, "resolved request");

    let session = Session::new(Pipeline::open_meteo(client_from_config(&cfg)?));
    let mut states = session.subscribe();
    let progress = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            match state {
                PipelineState::Resolving(location) => {
                    eprintln!("Looking up {}...", location.label())
                }
                PipelineState::Fetching(coords) => eprintln!(
                    "Fetching weather for {:.2}, {:.2}...",
                    coords.latitude, coords.longitude
                ),
                _ => {}
            }
        }
    });

    let outcome = session.submit(location).await;
    drop(session);
    let _ = progress.await;

    match outcome {
        Submission::Completed(Ok(vm)) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&*vm)?);
            } else {
                print!("{}", render::render(&vm));
            }
            Ok(())
        }
        Submission::Completed(Err(err)) => bail!(err.user_message()),
        Submission::Superseded => bail!("Request was superseded by a newer one"),
    }
}

fn non_blank(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("place must not be blank".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Turn CLI arguments into a request, reading the device position for
/// `current` when no coordinates were passed.
async fn resolve_location(
    cfg: &Config,
    place: &str,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<Location, PipelineError> {
    if place.trim() == CURRENT_ROUTE_TOKEN && lat.is_none() && lon.is_none() {
        return locate(&ConfiguredPosition::new(cfg.device.clone())).await;
    }

    Location::from_route(place, lat, lon)
}
