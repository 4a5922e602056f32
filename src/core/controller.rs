use crate::core::events::{EventBus, TimeSelection};
use crate::core::scale::{
    departure_ratio, marker_radius, marker_title, radius_range, QuantizeScale, SqrtScale,
};
use crate::core::time_filter::{filter_trips_by_time, selection_label, ANY_TIME};
use crate::core::traffic::{compute_station_traffic, max_total_traffic};
use crate::domain::model::{Station, StationMarker, TrafficSnapshot, Trip};
use crate::utils::error::{Result, TrafficError};

/// Owns the loaded stations and trips and re-aggregates them whenever the
/// time selection changes.
///
/// Either side may be missing when its load failed. Construction still
/// succeeds; the first [`select_time`](Self::select_time) then reports the gap.
#[derive(Debug)]
pub struct TrafficController {
    stations: Option<Vec<Station>>,
    trips: Option<Vec<Trip>>,
    radius_scale: SqrtScale,
    flow_scale: QuantizeScale,
    time_filter: i32,
}

impl TrafficController {
    /// Runs the unfiltered aggregation pass. The radius domain is fixed here
    /// and kept for every later selection; only the range follows the filter.
    pub fn new(stations: Option<Vec<Station>>, trips: Option<Vec<Trip>>) -> Self {
        let mut stations = stations;
        if let Some(stations) = stations.as_mut() {
            compute_station_traffic(stations, trips.as_deref().unwrap_or_default());
        }

        let max_traffic = stations.as_deref().map(max_total_traffic).unwrap_or(0);
        tracing::debug!("Radius domain fixed at [0, {}]", max_traffic);

        Self {
            stations,
            trips,
            radius_scale: SqrtScale::new((0.0, max_traffic as f64), radius_range(ANY_TIME)),
            flow_scale: QuantizeScale::default(),
            time_filter: ANY_TIME,
        }
    }

    pub fn stations(&self) -> Option<&[Station]> {
        self.stations.as_deref()
    }

    pub fn time_filter(&self) -> i32 {
        self.time_filter
    }

    pub fn radius_scale(&self) -> &SqrtScale {
        &self.radius_scale
    }

    /// Filters trips around `time_filter`, re-aggregates the stations in place
    /// and returns the resulting markers.
    pub fn select_time(&mut self, time_filter: i32) -> Result<TrafficSnapshot> {
        let trips = self
            .trips
            .as_deref()
            .ok_or_else(|| TrafficError::StateUnavailable {
                what: "trip records".to_string(),
            })?;
        let stations = self
            .stations
            .as_deref_mut()
            .ok_or_else(|| TrafficError::StateUnavailable {
                what: "station catalog".to_string(),
            })?;

        let filtered = filter_trips_by_time(trips, time_filter);
        compute_station_traffic(stations, &filtered);

        self.time_filter = time_filter;
        self.radius_scale.set_range(radius_range(time_filter));

        tracing::debug!(
            "Time filter {} kept {} of {} trips",
            time_filter,
            filtered.len(),
            trips.len()
        );

        let trip_count = filtered.len();
        self.snapshot(trip_count)
    }

    fn snapshot(&self, trip_count: usize) -> Result<TrafficSnapshot> {
        let stations = self
            .stations
            .as_deref()
            .ok_or_else(|| TrafficError::StateUnavailable {
                what: "station catalog".to_string(),
            })?;

        let markers = stations
            .iter()
            .map(|station| StationMarker {
                short_name: station.short_name.clone(),
                lon: station.lon,
                lat: station.lat,
                arrivals: station.arrivals,
                departures: station.departures,
                total_traffic: station.total_traffic,
                radius: marker_radius(station, &self.radius_scale),
                departure_ratio: self.flow_scale.scale(departure_ratio(station)),
                title: marker_title(station),
            })
            .collect();

        Ok(TrafficSnapshot {
            time_filter: self.time_filter,
            label: selection_label(self.time_filter),
            radius_range: self.radius_scale.range(),
            trip_count,
            stations: markers,
        })
    }
}

/// Controller state plus the snapshots produced so far, as seen by bus handlers.
#[derive(Debug)]
pub struct TrafficContext {
    pub controller: TrafficController,
    pub snapshots: Vec<TrafficSnapshot>,
}

impl TrafficContext {
    pub fn new(controller: TrafficController) -> Self {
        Self {
            controller,
            snapshots: Vec::new(),
        }
    }
}

/// An event bus wired to re-run the traffic pass on every time selection.
pub fn traffic_event_bus() -> EventBus<TrafficContext, TimeSelection> {
    let mut bus = EventBus::new();
    bus.subscribe(|ctx: &mut TrafficContext, selection: &TimeSelection| {
        let snapshot = ctx.controller.select_time(selection.minutes)?;
        tracing::info!(
            "🕒 {} - {} trips across {} stations",
            snapshot.label,
            snapshot.trip_count,
            snapshot.stations.len()
        );
        ctx.snapshots.push(snapshot);
        Ok(())
    });
    bus
}
