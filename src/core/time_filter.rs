use crate::domain::model::Trip;
use chrono::{NaiveDateTime, NaiveTime, Timelike};
use std::borrow::Cow;

/// Time selection meaning "no filter".
pub const ANY_TIME: i32 = -1;
pub const LAST_MINUTE_OF_DAY: i32 = 1439;
/// Half-width of the window around the selected minute.
pub const WINDOW_MINUTES: i32 = 60;

const MINUTES_PER_DAY: i32 = 1440;

pub fn minutes_since_midnight(timestamp: &NaiveDateTime) -> i32 {
    (timestamp.hour() * 60 + timestamp.minute()) as i32
}

fn within_window(timestamp: Option<&NaiveDateTime>, time_filter: i32) -> bool {
    // 無法解析的時間不會落在任何時間窗內
    timestamp
        .map(|ts| {
            i64::from(minutes_since_midnight(ts)).abs_diff(i64::from(time_filter))
                <= WINDOW_MINUTES as u64
        })
        .unwrap_or(false)
}

/// Keeps the trips that started or ended within an hour of `time_filter`.
///
/// `time_filter` is minutes since midnight, or [`ANY_TIME`] to keep
/// everything, in which case the input is borrowed rather than copied.
/// Only the time of day is compared and there is no wraparound at midnight,
/// so 23:50 and 00:05 are far apart.
pub fn filter_trips_by_time(trips: &[Trip], time_filter: i32) -> Cow<'_, [Trip]> {
    if time_filter == ANY_TIME {
        return Cow::Borrowed(trips);
    }

    Cow::Owned(
        trips
            .iter()
            .filter(|trip| {
                within_window(trip.started_at.as_ref(), time_filter)
                    || within_window(trip.ended_at.as_ref(), time_filter)
            })
            .cloned()
            .collect(),
    )
}

/// Clock label for a selection, e.g. `480` -> `"8:00 AM"`.
pub fn format_time(minutes: i32) -> String {
    let minutes = minutes.rem_euclid(MINUTES_PER_DAY) as u32;
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
        .map(|time| time.format("%-I:%M %p").to_string())
        .unwrap_or_default()
}

/// Label shown next to the slider: a clock time, or "(any time)".
pub fn selection_label(time_filter: i32) -> String {
    if time_filter == ANY_TIME {
        "(any time)".to_string()
    } else {
        format_time(time_filter)
    }
}
