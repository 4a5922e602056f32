use crate::domain::model::Station;
use crate::utils::error::{Result, TrafficError};
use std::collections::HashSet;

/// Where the station array lives in a GBFS `station_information` document.
pub const DEFAULT_STATION_PATH: &str = "/data/stations";

/// Parses the station catalog out of a JSON document.
///
/// `station_path` is a JSON pointer to the station array.
pub fn parse_station_catalog(bytes: &[u8], station_path: &str) -> Result<Vec<Station>> {
    let mut document: serde_json::Value = serde_json::from_slice(bytes)?;

    let stations = document
        .pointer_mut(station_path)
        .map(serde_json::Value::take)
        .ok_or_else(|| TrafficError::ProcessingError {
            message: format!("no station array at '{}'", station_path),
        })?;

    if !stations.is_array() {
        return Err(TrafficError::ProcessingError {
            message: format!("'{}' is not an array", station_path),
        });
    }

    let stations: Vec<Station> = serde_json::from_value(stations)?;

    let mut seen = HashSet::new();
    for station in &stations {
        if !seen.insert(station.short_name.as_str()) {
            tracing::warn!("Duplicate station short_name {}", station.short_name);
        }
    }

    tracing::debug!("Parsed {} stations from catalog", stations.len());
    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gbfs_document() {
        let document = serde_json::json!({
            "last_updated": 1700000000,
            "data": {"stations": [
                {"short_name": "A32000", "name": "Fan Pier", "lon": -71.044, "lat": 42.353},
                {"short_name": "M32006", "name": "MIT at Mass Ave", "lon": "-71.0934", "lat": "42.3581"}
            ]}
        });
        let bytes = serde_json::to_vec(&document).unwrap();

        let stations = parse_station_catalog(&bytes, DEFAULT_STATION_PATH).unwrap();

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].short_name, "A32000");
        assert_eq!(stations[1].lat, 42.3581);
    }

    #[test]
    fn test_custom_station_path() {
        let bytes = br#"{"stations": [{"short_name": "X", "lon": 1, "lat": 2}]}"#;
        let stations = parse_station_catalog(bytes, "/stations").unwrap();
        assert_eq!(stations[0].short_name, "X");
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let bytes = br#"{"data": {}}"#;
        let err = parse_station_catalog(bytes, DEFAULT_STATION_PATH).unwrap_err();
        assert!(matches!(err, TrafficError::ProcessingError { .. }));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = parse_station_catalog(b"{not json", DEFAULT_STATION_PATH).unwrap_err();
        assert!(matches!(err, TrafficError::SerializationError(_)));
    }
}
