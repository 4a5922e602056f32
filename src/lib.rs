pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::adapters::storage::LocalStorage;
pub use crate::app::pipelines::traffic_pipeline::TrafficPipeline;
pub use crate::config::toml_config::TomlConfig;
pub use crate::core::{
    controller::TrafficController,
    engine::TrafficEngine,
    time_filter::filter_trips_by_time,
    traffic::compute_station_traffic,
};
pub use crate::utils::error::{Result, TrafficError};
