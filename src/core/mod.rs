pub mod catalog;
pub mod controller;
pub mod engine;
pub mod events;
pub mod routes;
pub mod scale;
pub mod time_filter;
pub mod traffic;
pub mod trips;

pub use crate::domain::model::{LoadedData, Station, TransformResult, Trip};
pub use crate::domain::ports::{ConfigProvider, Pipeline, RouteSource, Storage};
pub use crate::utils::error::Result;
