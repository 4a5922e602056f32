use crate::domain::model::{Station, Trip};
use std::collections::HashMap;

fn count_by<'a>(trips: &'a [Trip], key: impl Fn(&'a Trip) -> &'a str) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for trip in trips {
        *counts.entry(key(trip)).or_insert(0) += 1;
    }
    counts
}

/// Annotates every station with the arrivals and departures found in `trips`.
///
/// Stations are updated in place and handed back in their original order, so
/// the same catalog can be re-aggregated against each filtered trip subset.
/// Trips whose station ids don't appear in the catalog count for nothing.
pub fn compute_station_traffic<'s>(stations: &'s mut [Station], trips: &[Trip]) -> &'s mut [Station] {
    let departures = count_by(trips, |trip| trip.start_station_id.as_str());
    let arrivals = count_by(trips, |trip| trip.end_station_id.as_str());

    for station in stations.iter_mut() {
        let id = station.short_name.as_str();
        station.arrivals = arrivals.get(id).copied().unwrap_or(0);
        station.departures = departures.get(id).copied().unwrap_or(0);
        station.total_traffic = station.arrivals + station.departures;
    }

    stations
}

pub fn max_total_traffic(stations: &[Station]) -> usize {
    stations
        .iter()
        .map(|station| station.total_traffic)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trip(start: &str, end: &str, start_hm: (u32, u32), end_hm: (u32, u32)) -> Trip {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        Trip {
            start_station_id: start.to_string(),
            end_station_id: end.to_string(),
            started_at: day.and_hms_opt(start_hm.0, start_hm.1, 0),
            ended_at: day.and_hms_opt(end_hm.0, end_hm.1, 0),
        }
    }

    fn catalog() -> Vec<Station> {
        vec![
            Station::new("A", -71.09, 42.36),
            Station::new("B", -71.10, 42.37),
        ]
    }

    #[test]
    fn test_counts_arrivals_and_departures() {
        let mut stations = catalog();
        let trips = vec![
            trip("A", "B", (8, 5), (8, 20)),
            trip("A", "A", (8, 10), (8, 30)),
        ];

        let result = compute_station_traffic(&mut stations, &trips);

        assert_eq!(result[0].short_name, "A");
        assert_eq!(
            (result[0].departures, result[0].arrivals, result[0].total_traffic),
            (2, 1, 3)
        );
        assert_eq!(result[1].short_name, "B");
        assert_eq!(
            (result[1].departures, result[1].arrivals, result[1].total_traffic),
            (0, 1, 1)
        );
    }

    #[test]
    fn test_empty_trips_zero_every_station() {
        let mut stations = catalog();
        compute_station_traffic(&mut stations, &[trip("A", "B", (9, 0), (9, 10))]);
        compute_station_traffic(&mut stations, &[]);

        for station in &stations {
            assert_eq!(station.arrivals, 0);
            assert_eq!(station.departures, 0);
            assert_eq!(station.total_traffic, 0);
        }
    }

    #[test]
    fn test_dangling_station_ids_are_ignored() {
        let mut stations = catalog();
        let trips = vec![
            trip("A", "GONE", (7, 0), (7, 15)),
            trip("GONE", "B", (7, 0), (7, 15)),
        ];

        compute_station_traffic(&mut stations, &trips);

        assert_eq!(stations[0].total_traffic, 1);
        assert_eq!(stations[1].total_traffic, 1);
        assert_eq!(stations.len(), 2);
    }

    #[test]
    fn test_repeated_passes_are_idempotent() {
        let mut stations = catalog();
        let trips = vec![
            trip("B", "A", (12, 0), (12, 40)),
            trip("B", "B", (13, 0), (13, 5)),
        ];

        compute_station_traffic(&mut stations, &trips);
        let first = stations.clone();
        compute_station_traffic(&mut stations, &trips);

        assert_eq!(first, stations);
        assert!(stations
            .iter()
            .all(|s| s.total_traffic == s.arrivals + s.departures));
    }

    #[test]
    fn test_max_total_traffic() {
        let mut stations = catalog();
        assert_eq!(max_total_traffic(&stations), 0);
        compute_station_traffic(&mut stations, &[trip("A", "A", (1, 0), (1, 1))]);
        assert_eq!(max_total_traffic(&stations), 2);
    }
}
