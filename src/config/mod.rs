#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::*;

pub const DEFAULT_STATIONS_SOURCE: &str = "assets/bluebikes_stations.json";
pub const DEFAULT_TRIPS_SOURCE: &str = "assets/bluebikes_traffic.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Checks that apply whichever way the settings were supplied.
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_source("stations", config.stations_source(), &["json"])?;
    validate_source("trips", config.trips_source(), &["csv"])?;
    validate_json_pointer("station_path", config.station_path())?;

    for route in config.route_sources() {
        validate_non_empty_string("routes.id", &route.id)?;
        validate_source("routes.location", &route.location, &["geojson", "json"])?;
    }

    validate_time_selections("times", config.time_selections())?;
    validate_path("output_path", config.output_path())?;
    validate_output_formats("output_formats", config.output_formats())?;
    validate_positive_number("timeout_seconds", config.request_timeout_seconds(), 1)?;

    Ok(())
}
