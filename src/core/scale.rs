//! Scales that turn traffic counts into marker geometry. Both follow the d3
//! conventions the station map was drawn with: no clamping, and a degenerate
//! domain maps to the middle of the range.

use crate::core::time_filter::ANY_TIME;
use crate::domain::model::Station;

pub const UNFILTERED_RADIUS_RANGE: (f64, f64) = (0.0, 25.0);
pub const FILTERED_RADIUS_RANGE: (f64, f64) = (3.0, 50.0);
pub const FLOW_BUCKETS: [f64; 3] = [0.0, 0.5, 1.0];

fn signed_sqrt(x: f64) -> f64 {
    if x < 0.0 {
        -(-x).sqrt()
    } else {
        x.sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl SqrtScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn set_range(&mut self, range: (f64, f64)) {
        self.range = range;
    }

    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = (signed_sqrt(self.domain.0), signed_sqrt(self.domain.1));
        let span = d1 - d0;
        let t = if span.is_nan() {
            f64::NAN
        } else if span == 0.0 {
            0.5
        } else {
            (signed_sqrt(value) - d0) / span
        };
        // d3 interpolateNumber
        self.range.0 * (1.0 - t) + self.range.1 * t
    }
}

/// Maps a continuous domain onto evenly sized buckets of a discrete range.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizeScale {
    thresholds: Vec<f64>,
    range: Vec<f64>,
}

impl QuantizeScale {
    pub fn new(domain: (f64, f64), range: &[f64]) -> Self {
        let (x0, x1) = domain;
        let n = range.len().saturating_sub(1) as f64;
        let thresholds = (0..range.len().saturating_sub(1))
            .map(|i| {
                let i = i as f64;
                ((i + 1.0) * x1 - (i - n) * x0) / (n + 1.0)
            })
            .collect();
        Self {
            thresholds,
            range: range.to_vec(),
        }
    }

    /// `None` for NaN input, which d3 leaves as `undefined`.
    pub fn scale(&self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        let index = self.thresholds.partition_point(|&t| t <= value);
        self.range.get(index).copied()
    }
}

impl Default for QuantizeScale {
    fn default() -> Self {
        Self::new((0.0, 1.0), &FLOW_BUCKETS)
    }
}

pub fn radius_range(time_filter: i32) -> (f64, f64) {
    if time_filter == ANY_TIME {
        UNFILTERED_RADIUS_RANGE
    } else {
        FILTERED_RADIUS_RANGE
    }
}

pub fn marker_radius(station: &Station, scale: &SqrtScale) -> f64 {
    if station.total_traffic > 0 {
        scale.scale(station.total_traffic as f64)
    } else {
        0.0
    }
}

/// Departure share of a station's traffic; NaN when it had none.
pub fn departure_ratio(station: &Station) -> f64 {
    station.departures as f64 / station.total_traffic as f64
}

pub fn marker_title(station: &Station) -> String {
    format!(
        "{} trips ({} departures, {} arrivals)",
        station.total_traffic, station.departures, station.arrivals
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_scale() {
        let scale = SqrtScale::new((0.0, 100.0), UNFILTERED_RADIUS_RANGE);
        assert_eq!(scale.scale(0.0), 0.0);
        assert_eq!(scale.scale(25.0), 12.5);
        assert_eq!(scale.scale(100.0), 25.0);
        // no clamping
        assert_eq!(scale.scale(400.0), 50.0);
    }

    #[test]
    fn test_sqrt_scale_hits_range_ends_exactly() {
        let scale = SqrtScale::new((0.0, 4.0), (0.1, 0.3));
        assert_eq!(scale.scale(0.0), 0.1);
        assert_eq!(scale.scale(4.0), 0.3);

        let scale = SqrtScale::new((0.0, 4.0), FILTERED_RADIUS_RANGE);
        assert_eq!(scale.scale(0.0), 3.0);
        assert_eq!(scale.scale(1.0), 26.5);
        assert_eq!(scale.scale(4.0), 50.0);
    }

    #[test]
    fn test_sqrt_scale_degenerate_domain_uses_midpoint() {
        let scale = SqrtScale::new((0.0, 0.0), FILTERED_RADIUS_RANGE);
        assert_eq!(scale.scale(0.0), 26.5);
    }

    #[test]
    fn test_quantize_buckets() {
        let flow = QuantizeScale::default();
        assert_eq!(flow.scale(0.0), Some(0.0));
        assert_eq!(flow.scale(0.3), Some(0.0));
        assert_eq!(flow.scale(1.0 / 3.0), Some(0.5));
        assert_eq!(flow.scale(0.5), Some(0.5));
        assert_eq!(flow.scale(2.0 / 3.0), Some(1.0));
        assert_eq!(flow.scale(1.0), Some(1.0));
        assert_eq!(flow.scale(f64::NAN), None);
    }

    #[test]
    fn test_zero_traffic_station() {
        let station = Station::new("Z", 0.0, 0.0);
        let scale = SqrtScale::new((0.0, 10.0), FILTERED_RADIUS_RANGE);

        assert_eq!(marker_radius(&station, &scale), 0.0);
        assert!(departure_ratio(&station).is_nan());
        assert_eq!(QuantizeScale::default().scale(departure_ratio(&station)), None);
        assert_eq!(marker_title(&station), "0 trips (0 departures, 0 arrivals)");
    }

    #[test]
    fn test_radius_range_depends_on_filter() {
        assert_eq!(radius_range(ANY_TIME), (0.0, 25.0));
        assert_eq!(radius_range(480), (3.0, 50.0));
    }
}
