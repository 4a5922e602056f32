use crate::config::{
    validate_provider, DEFAULT_OUTPUT_PATH, DEFAULT_STATIONS_SOURCE, DEFAULT_TIMEOUT_SECONDS,
    DEFAULT_TRIPS_SOURCE,
};
use crate::core::catalog::DEFAULT_STATION_PATH;
use crate::core::time_filter::ANY_TIME;
use crate::core::{ConfigProvider, RouteSource};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Parses `id=location` into a route source.
fn parse_route(raw: &str) -> std::result::Result<RouteSource, String> {
    match raw.split_once('=') {
        Some((id, location)) if !id.trim().is_empty() && !location.trim().is_empty() => {
            Ok(RouteSource {
                id: id.trim().to_string(),
                location: location.trim().to_string(),
            })
        }
        _ => Err(format!("expected ID=LOCATION, got '{}'", raw)),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "bluebikes-traffic")]
#[command(about = "Bike-share station traffic by time of day")]
pub struct CliConfig {
    /// Station catalog (JSON), local path or URL
    #[arg(long, default_value = DEFAULT_STATIONS_SOURCE)]
    pub stations: String,

    /// Trip records (CSV), local path or URL
    #[arg(long, default_value = DEFAULT_TRIPS_SOURCE)]
    pub trips: String,

    /// JSON pointer to the station array inside the catalog
    #[arg(long, default_value = DEFAULT_STATION_PATH)]
    pub station_path: String,

    /// Bike-lane GeoJSON layer as ID=LOCATION, repeatable
    #[arg(long = "route", value_parser = parse_route)]
    pub routes: Vec<RouteSource>,

    /// Minutes since midnight to filter around, -1 for any time; repeatable
    #[arg(long = "time", allow_negative_numbers = true, default_values_t = vec![ANY_TIME])]
    pub times: Vec<i32>,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv,json")]
    pub formats: Vec<String>,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn stations_source(&self) -> &str {
        &self.stations
    }

    fn trips_source(&self) -> &str {
        &self.trips
    }

    fn station_path(&self) -> &str {
        &self.station_path
    }

    fn route_sources(&self) -> &[RouteSource] {
        &self.routes
    }

    fn time_selections(&self) -> &[i32] {
        &self.times
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
