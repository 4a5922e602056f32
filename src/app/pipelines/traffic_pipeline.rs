use crate::adapters::http::SourceFetcher;
use crate::core::catalog::parse_station_catalog;
use crate::core::controller::{traffic_event_bus, TrafficContext, TrafficController};
use crate::core::events::TimeSelection;
use crate::core::routes::{bike_lane_layer, parse_route_source};
use crate::core::trips::parse_trip_records;
use crate::core::{
    ConfigProvider, LoadedData, Pipeline, RouteSource, Station, Storage, TransformResult, Trip,
};
use crate::domain::model::BikeLaneLayer;
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const OUTPUT_FILE: &str = "traffic_output.zip";

/// Loads stations, trips and bike-lane routes, replays the configured time
/// selections and bundles the results into a zip archive.
pub struct TrafficPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    fetcher: SourceFetcher,
}

impl<S: Storage, C: ConfigProvider> TrafficPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let fetcher = SourceFetcher::new(config.request_timeout_seconds());
        Self {
            storage,
            config,
            fetcher,
        }
    }

    async fn load_stations(&self) -> Result<Vec<Station>> {
        let bytes = self.fetcher.fetch(self.config.stations_source()).await?;
        parse_station_catalog(&bytes, self.config.station_path())
    }

    async fn load_trips(&self) -> Result<Vec<Trip>> {
        let bytes = self.fetcher.fetch(self.config.trips_source()).await?;
        parse_trip_records(bytes.as_slice())
    }

    async fn load_route(&self, route: &RouteSource) -> Result<BikeLaneLayer> {
        let bytes = self.fetcher.fetch(&route.location).await?;
        let geojson = parse_route_source(&bytes)?;
        Ok(bike_lane_layer(&route.id, &route.location, &geojson))
    }

    async fn load_routes(&self) -> Vec<BikeLaneLayer> {
        let mut layers = Vec::new();
        for route in self.config.route_sources() {
            match self.load_route(route).await {
                Ok(layer) => layers.push(layer),
                Err(e) => tracing::error!("❌ Error loading route layer '{}': {}", route.id, e),
            }
        }
        layers
    }
}

// 載入失敗只記錄錯誤，對應的狀態保持為 None
fn loaded<T>(what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!("❌ Error loading {}: {}", what, e);
            tracing::debug!("💡 {}", e.recovery_suggestion());
            None
        }
    }
}

#[derive(Serialize)]
struct StationRow<'a> {
    short_name: &'a str,
    name: Option<&'a str>,
    lon: f64,
    lat: f64,
    arrivals: usize,
    departures: usize,
    total_traffic: usize,
}

impl<'a> From<&'a Station> for StationRow<'a> {
    fn from(station: &'a Station) -> Self {
        Self {
            short_name: &station.short_name,
            name: station.name.as_deref(),
            lon: station.lon,
            lat: station.lat,
            arrivals: station.arrivals,
            departures: station.departures,
            total_traffic: station.total_traffic,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for TrafficPipeline<S, C> {
    async fn extract(&self) -> Result<LoadedData> {
        tracing::info!("📡 Loading stations from: {}", self.config.stations_source());
        tracing::info!("📡 Loading trips from: {}", self.config.trips_source());

        // 兩個來源互不相依，同時載入
        let (stations, trips, layers) =
            tokio::join!(self.load_stations(), self.load_trips(), self.load_routes());

        Ok(LoadedData {
            stations: loaded("station catalog", stations),
            trips: loaded("trip records", trips),
            layers,
        })
    }

    async fn transform(&self, data: LoadedData) -> Result<TransformResult> {
        let controller = TrafficController::new(data.stations, data.trips);
        let stations = controller.stations().map(<[Station]>::to_vec);

        let mut ctx = TrafficContext::new(controller);
        let mut bus = traffic_event_bus();
        for &minutes in self.config.time_selections() {
            bus.publish(TimeSelection { minutes });
        }
        let report = bus.dispatch(&mut ctx);

        Ok(TransformResult {
            stations,
            snapshots: ctx.snapshots,
            layers: data.layers,
            failed_selections: report.failed,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let formats = self.config.output_formats();
        let wants = |format: &str| formats.iter().any(|f| f == format);

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            if let Some(stations) = &result.stations {
                if wants("json") {
                    zip.start_file("stations.json", SimpleFileOptions::default())?;
                    zip.write_all(serde_json::to_string_pretty(stations)?.as_bytes())?;
                }
                if wants("csv") {
                    zip.start_file("stations.csv", SimpleFileOptions::default())?;
                    let mut writer = csv::Writer::from_writer(&mut zip);
                    for station in stations {
                        writer.serialize(StationRow::from(station))?;
                    }
                    writer.flush()?;
                }
            } else {
                tracing::warn!("Station catalog unavailable, skipping station files");
            }

            zip.start_file("snapshots.json", SimpleFileOptions::default())?;
            zip.write_all(serde_json::to_string_pretty(&result.snapshots)?.as_bytes())?;

            if !result.layers.is_empty() {
                zip.start_file("layers.json", SimpleFileOptions::default())?;
                zip.write_all(serde_json::to_string_pretty(&result.layers)?.as_bytes())?;
            }

            zip.finish()?.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(OUTPUT_FILE, &zip_data).await?;

        Ok(format!("{}/{}", self.config.output_path(), OUTPUT_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Read;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        stations_source: String,
        trips_source: String,
        routes: Vec<RouteSource>,
        times: Vec<i32>,
        formats: Vec<String>,
    }

    impl MockConfig {
        fn new(stations_source: String, trips_source: String) -> Self {
            Self {
                stations_source,
                trips_source,
                routes: vec![],
                times: vec![-1, 480],
                formats: vec!["csv".to_string(), "json".to_string()],
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn stations_source(&self) -> &str {
            &self.stations_source
        }

        fn trips_source(&self) -> &str {
            &self.trips_source
        }

        fn station_path(&self) -> &str {
            "/data/stations"
        }

        fn route_sources(&self) -> &[RouteSource] {
            &self.routes
        }

        fn time_selections(&self) -> &[i32] {
            &self.times
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn request_timeout_seconds(&self) -> u64 {
            5
        }
    }

    fn write_inputs(dir: &tempfile::TempDir) -> (String, String) {
        let stations = dir.path().join("stations.json");
        std::fs::write(
            &stations,
            r#"{"data": {"stations": [
                {"short_name": "A", "name": "Kendall", "lon": "-71.09", "lat": "42.36"},
                {"short_name": "B", "lon": -71.10, "lat": 42.37}
            ]}}"#,
        )
        .unwrap();

        let trips = dir.path().join("trips.csv");
        std::fs::write(
            &trips,
            "start_station_id,end_station_id,started_at,ended_at\n\
             A,B,2024-03-01 08:05:00,2024-03-01 08:20:00\n\
             A,A,2024-03-01 08:10:00,2024-03-01 08:30:00\n\
             B,A,2024-03-01 18:00:00,2024-03-01 18:10:00\n",
        )
        .unwrap();

        (
            stations.to_str().unwrap().to_string(),
            trips.to_str().unwrap().to_string(),
        )
    }

    #[tokio::test]
    async fn test_extract_loads_both_sources() {
        let dir = tempfile::TempDir::new().unwrap();
        let (stations, trips) = write_inputs(&dir);
        let pipeline = TrafficPipeline::new(MockStorage::new(), MockConfig::new(stations, trips));

        let data = pipeline.extract().await.unwrap();

        assert_eq!(data.stations.unwrap().len(), 2);
        assert_eq!(data.trips.unwrap().len(), 3);
        assert!(data.layers.is_empty());
    }

    #[tokio::test]
    async fn test_extract_degrades_on_missing_source() {
        let dir = tempfile::TempDir::new().unwrap();
        let (stations, _) = write_inputs(&dir);
        let config = MockConfig::new(stations, "missing/trips.csv".to_string());
        let pipeline = TrafficPipeline::new(MockStorage::new(), config);

        let data = pipeline.extract().await.unwrap();

        assert!(data.stations.is_some());
        assert!(data.trips.is_none());
    }

    #[tokio::test]
    async fn test_transform_replays_time_selections() {
        let dir = tempfile::TempDir::new().unwrap();
        let (stations, trips) = write_inputs(&dir);
        let pipeline = TrafficPipeline::new(MockStorage::new(), MockConfig::new(stations, trips));

        let data = pipeline.extract().await.unwrap();
        let result = pipeline.transform(data).await.unwrap();

        let stations = result.stations.unwrap();
        assert_eq!(stations[0].total_traffic, 4);
        assert_eq!(result.snapshots.len(), 2);
        assert_eq!(result.snapshots[0].trip_count, 3);
        assert_eq!(result.snapshots[1].trip_count, 2);
        assert_eq!(result.failed_selections, 0);
    }

    #[tokio::test]
    async fn test_transform_counts_failed_selections() {
        let pipeline = TrafficPipeline::new(
            MockStorage::new(),
            MockConfig::new("a.json".to_string(), "b.csv".to_string()),
        );

        let result = pipeline.transform(LoadedData::default()).await.unwrap();

        assert!(result.stations.is_none());
        assert!(result.snapshots.is_empty());
        assert_eq!(result.failed_selections, 2);
    }

    #[tokio::test]
    async fn test_load_writes_zip_bundle() {
        let dir = tempfile::TempDir::new().unwrap();
        let (stations, trips) = write_inputs(&dir);
        let storage = MockStorage::new();
        let pipeline = TrafficPipeline::new(storage.clone(), MockConfig::new(stations, trips));

        let data = pipeline.extract().await.unwrap();
        let result = pipeline.transform(data).await.unwrap();
        let output = pipeline.load(result).await.unwrap();

        assert_eq!(output, "test_output/traffic_output.zip");

        let zip_data = storage.get_file(OUTPUT_FILE).await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        assert!(names.contains(&"stations.json".to_string()));
        assert!(names.contains(&"stations.csv".to_string()));
        assert!(names.contains(&"snapshots.json".to_string()));
        assert!(!names.contains(&"layers.json".to_string()));

        let mut csv_content = String::new();
        archive
            .by_name("stations.csv")
            .unwrap()
            .read_to_string(&mut csv_content)
            .unwrap();
        assert!(csv_content.starts_with("short_name,name,lon,lat,arrivals,departures,total_traffic"));
        assert!(csv_content.contains("A,Kendall,-71.09,42.36,2,2,4"));
    }
}
