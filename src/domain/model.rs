use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// One completed ride. Timestamps that failed to parse are kept as `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
}

/// A dock location from the station catalog, annotated with traffic counts.
///
/// `arrivals`, `departures` and `total_traffic` are owned by
/// [`compute_station_traffic`](crate::core::traffic::compute_station_traffic);
/// any value present in the source document is overwritten on the first pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub short_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(deserialize_with = "coordinate")]
    pub lon: f64,
    #[serde(deserialize_with = "coordinate")]
    pub lat: f64,
    #[serde(default)]
    pub arrivals: usize,
    #[serde(default)]
    pub departures: usize,
    #[serde(default)]
    pub total_traffic: usize,
    /// Catalog fields this crate doesn't interpret, written back unchanged.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Station {
    pub fn new(short_name: impl Into<String>, lon: f64, lat: f64) -> Self {
        Self {
            short_name: short_name.into(),
            name: None,
            lon,
            lat,
            arrivals: 0,
            departures: 0,
            total_traffic: 0,
            extra: serde_json::Map::new(),
        }
    }
}

// Catalogs publish coordinates either as numbers or as numeric strings.
fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid coordinate '{}'", text))),
    }
}

/// Paint properties of a bike-lane line layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePaint {
    pub line_color: String,
    pub line_width: f64,
    pub line_opacity: f64,
}

impl Default for LinePaint {
    fn default() -> Self {
        Self {
            line_color: "green".to_string(),
            line_width: 3.0,
            line_opacity: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BikeLaneLayer {
    pub id: String,
    pub source: String,
    pub paint: LinePaint,
    pub feature_count: usize,
    pub line_count: usize,
}

/// What a presentation layer needs to draw one station marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationMarker {
    pub short_name: String,
    pub lon: f64,
    pub lat: f64,
    pub arrivals: usize,
    pub departures: usize,
    pub total_traffic: usize,
    pub radius: f64,
    /// Quantized departure share; `None` for stations without traffic.
    pub departure_ratio: Option<f64>,
    pub title: String,
}

/// Station markers after one time selection has been applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficSnapshot {
    pub time_filter: i32,
    pub label: String,
    pub radius_range: (f64, f64),
    pub trip_count: usize,
    pub stations: Vec<StationMarker>,
}

/// Output of the extract phase. A source that failed to load is `None`.
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    pub stations: Option<Vec<Station>>,
    pub trips: Option<Vec<Trip>>,
    pub layers: Vec<BikeLaneLayer>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    /// Stations annotated with unfiltered traffic, if the catalog loaded.
    pub stations: Option<Vec<Station>>,
    pub snapshots: Vec<TrafficSnapshot>,
    pub layers: Vec<BikeLaneLayer>,
    pub failed_selections: usize,
}
