use crate::domain::model::{LoadedData, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// A named GeoJSON source for a bike-lane layer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RouteSource {
    pub id: String,
    pub location: String,
}

pub trait ConfigProvider: Send + Sync {
    fn stations_source(&self) -> &str;
    fn trips_source(&self) -> &str;
    fn station_path(&self) -> &str;
    fn route_sources(&self) -> &[RouteSource];
    fn time_selections(&self) -> &[i32];
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn request_timeout_seconds(&self) -> u64;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<LoadedData>;
    async fn transform(&self, data: LoadedData) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
