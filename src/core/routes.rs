use crate::domain::model::{BikeLaneLayer, LinePaint};
use crate::utils::error::{Result, TrafficError};
use geojson::{GeoJson, Geometry, Value};

pub fn parse_route_source(bytes: &[u8]) -> Result<GeoJson> {
    let text = std::str::from_utf8(bytes).map_err(|e| TrafficError::ProcessingError {
        message: format!("route source is not UTF-8: {}", e),
    })?;
    Ok(text.parse::<GeoJson>()?)
}

fn line_count(geometry: &Geometry) -> usize {
    match &geometry.value {
        Value::LineString(_) => 1,
        Value::MultiLineString(lines) => lines.len(),
        Value::GeometryCollection(geometries) => geometries.iter().map(line_count).sum(),
        _ => 0,
    }
}

/// Describes a green bike-lane line layer drawn from one route source.
pub fn bike_lane_layer(id: &str, source: &str, geojson: &GeoJson) -> BikeLaneLayer {
    let (feature_count, line_count) = match geojson {
        GeoJson::FeatureCollection(collection) => (
            collection.features.len(),
            collection
                .features
                .iter()
                .filter_map(|feature| feature.geometry.as_ref())
                .map(line_count)
                .sum(),
        ),
        GeoJson::Feature(feature) => (1, feature.geometry.as_ref().map(line_count).unwrap_or(0)),
        GeoJson::Geometry(geometry) => (0, line_count(geometry)),
    };

    BikeLaneLayer {
        id: id.to_string(),
        source: source.to_string(),
        paint: LinePaint::default(),
        feature_count,
        line_count,
    }
}
