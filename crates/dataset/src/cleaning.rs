//! Cleaning rules that turn raw CSV rows into validated domain records.
//!
//! Rows that cannot be repaired are dropped rather than reported as errors; the
//! number of dropped rows is surfaced through `CleaningSummary` and the logs.

use crate::raw::{RawMaintenance, RawStation, RawTrip};
use chrono::{NaiveDate, NaiveDateTime};
use core_types::{BikeType, MaintenanceRecord, Station, Trip, TripStatus, UserType};
use itertools::Itertools;
use rust_decimal::prelude::*;
use serde::Serialize;

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Row counts of one table before and after cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleaningSummary {
    pub table: String,
    pub raw_rows: usize,
    pub kept_rows: usize,
}

impl CleaningSummary {
    pub fn new(table: &str, raw_rows: usize, kept_rows: usize) -> Self {
        Self {
            table: table.to_string(),
            raw_rows,
            kept_rows,
        }
    }

    pub fn dropped_rows(&self) -> usize {
        self.raw_rows.saturating_sub(self.kept_rows)
    }
}

/// Cleans raw trip rows.
///
/// Rows are dropped when an id is missing, a timestamp or the distance cannot be
/// parsed, the trip ends before it starts, or the duration or distance is
/// negative. A missing duration is derived from the timestamps. A missing status
/// becomes `completed` for trips with a positive duration and `unknown` otherwise.
/// Exact duplicates (after normalization) are removed, keeping the first.
pub fn clean_trips(rows: &[RawTrip]) -> Vec<Trip> {
    let cleaned: Vec<Trip> = rows.iter().filter_map(clean_trip).unique().collect();

    tracing::info!(
        raw = rows.len(),
        kept = cleaned.len(),
        dropped = rows.len() - cleaned.len(),
        "cleaned trips"
    );
    cleaned
}

fn clean_trip(row: &RawTrip) -> Option<Trip> {
    let start_time = row.start_time.as_deref().and_then(parse_timestamp)?;
    let end_time = row.end_time.as_deref().and_then(parse_timestamp)?;
    let distance_km = row.distance_km.as_deref().and_then(parse_decimal)?;

    let mut trip = Trip {
        trip_id: required(&row.trip_id)?,
        user_id: required(&row.user_id)?,
        user_type: UserType::parse_normalized(row.user_type.as_deref().unwrap_or_default()),
        bike_id: required(&row.bike_id)?,
        bike_type: BikeType::parse_normalized(row.bike_type.as_deref().unwrap_or_default()),
        start_station_id: required(&row.start_station_id)?,
        end_station_id: required(&row.end_station_id)?,
        start_time,
        end_time,
        duration_minutes: Decimal::ZERO,
        distance_km,
        status: TripStatus::Unknown,
    };

    let elapsed = trip.elapsed_minutes();
    trip.duration_minutes = row
        .duration_minutes
        .as_deref()
        .and_then(parse_decimal)
        .unwrap_or(elapsed);

    trip.status = match row.status.as_deref().map(str::trim) {
        Some(status) if !status.is_empty() => TripStatus::parse_normalized(status),
        _ if trip.duration_minutes > Decimal::ZERO => TripStatus::Completed,
        _ => TripStatus::Unknown,
    };

    match trip.validate() {
        Ok(()) => Some(trip),
        Err(e) => {
            tracing::debug!("dropping trip: {}", e);
            None
        }
    }
}

/// Cleans raw station rows.
///
/// Ids are upper-cased, names trimmed. Rows with a missing field, a non-positive
/// capacity or coordinates out of range are dropped, as are exact duplicates.
pub fn clean_stations(rows: &[RawStation]) -> Vec<Station> {
    let cleaned: Vec<Station> = rows
        .iter()
        .filter_map(clean_station)
        .unique_by(|s| {
            (
                s.station_id.clone(),
                s.name.clone(),
                s.capacity,
                s.latitude.to_bits(),
                s.longitude.to_bits(),
            )
        })
        .collect();

    tracing::info!(
        raw = rows.len(),
        kept = cleaned.len(),
        dropped = rows.len() - cleaned.len(),
        "cleaned stations"
    );
    cleaned
}

fn clean_station(row: &RawStation) -> Option<Station> {
    let station_id = required(&row.station_id)?.to_uppercase();
    let name = required(&row.station_name)?;
    let capacity = row.capacity.as_deref().and_then(parse_count)?;
    let latitude = row.latitude.as_deref().and_then(parse_float)?;
    let longitude = row.longitude.as_deref().and_then(parse_float)?;

    match Station::new(station_id, name, capacity, latitude, longitude) {
        Ok(station) => Some(station),
        Err(e) => {
            tracing::debug!("dropping station: {}", e);
            None
        }
    }
}

/// Cleans raw maintenance rows.
///
/// Rows missing the record id, bike id, date, maintenance type or cost are
/// dropped, as are negative costs and exact duplicates. Bike and maintenance
/// types are normalized to lower case.
pub fn clean_maintenance(rows: &[RawMaintenance]) -> Vec<MaintenanceRecord> {
    let cleaned: Vec<MaintenanceRecord> = rows
        .iter()
        .filter_map(clean_maintenance_record)
        .unique()
        .collect();

    tracing::info!(
        raw = rows.len(),
        kept = cleaned.len(),
        dropped = rows.len() - cleaned.len(),
        "cleaned maintenance records"
    );
    cleaned
}

fn clean_maintenance_record(row: &RawMaintenance) -> Option<MaintenanceRecord> {
    let record = MaintenanceRecord {
        record_id: required(&row.record_id)?,
        bike_id: required(&row.bike_id)?,
        bike_type: BikeType::parse_normalized(row.bike_type.as_deref().unwrap_or_default()),
        date: row.date.as_deref().and_then(parse_timestamp)?,
        maintenance_type: required(&row.maintenance_type)?.to_lowercase(),
        cost: row.cost.as_deref().and_then(parse_decimal)?,
        description: row.description.as_deref().unwrap_or_default().trim().to_string(),
    };

    record.validate().ok().map(|()| record)
}

/// Parses the timestamp layouts found in the exports; a bare date means midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Parses plain or scientific decimal notation.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parses a count written either as an integer or as a whole float (`"20.0"`).
fn parse_count(raw: &str) -> Option<u32> {
    let value = parse_decimal(raw)?;
    if value.fract().is_zero() {
        value.to_u32()
    } else {
        None
    }
}

fn required(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
