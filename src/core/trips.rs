use crate::domain::model::Trip;
use crate::utils::error::Result;
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

const TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a trip timestamp, keeping the wall-clock time as written.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.naive_local());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Reads trip rows from CSV. Columns other than the four below are ignored,
/// and rows may be shorter or longer than the header.
pub fn parse_trip_records<R: std::io::Read>(reader: R) -> Result<Vec<Trip>> {
    let mut trips = Vec::new();
    let mut unparsed = 0;

    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut row = csv::StringRecord::new();

    while rdr.read_record(&mut row)? {
        // 欄位不足的列補空值，多出的欄位捨去
        row.truncate(headers.len());
        while row.len() < headers.len() {
            row.push_field("");
        }
        let rec: Record = row.deserialize(Some(&headers))?;
        let started_at = parse_timestamp(&rec.started_at);
        let ended_at = parse_timestamp(&rec.ended_at);
        if started_at.is_none() || ended_at.is_none() {
            unparsed += 1;
        }

        trips.push(Trip {
            start_station_id: rec.start_station_id,
            end_station_id: rec.end_station_id,
            started_at,
            ended_at,
        });
    }

    if unparsed > 0 {
        // These still count when no time filter is active
        tracing::warn!("{} trips have timestamps that could not be parsed", unparsed);
    }
    tracing::debug!("Parsed {} trip records", trips.len());
    Ok(trips)
}

#[derive(Deserialize)]
struct Record {
    start_station_id: String,
    end_station_id: String,
    started_at: String,
    ended_at: String,
}
