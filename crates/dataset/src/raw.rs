//! Row shapes of the raw CSV exports.
//!
//! Every column is optional: an empty cell or a missing column deserializes to
//! `None`, and all interpretation is left to the cleaning step.

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct RawTrip {
    pub trip_id: Option<String>,
    pub user_id: Option<String>,
    pub user_type: Option<String>,
    pub bike_id: Option<String>,
    pub bike_type: Option<String>,
    pub start_station_id: Option<String>,
    pub end_station_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration_minutes: Option<String>,
    pub distance_km: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct RawStation {
    pub station_id: Option<String>,
    pub station_name: Option<String>,
    pub capacity: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct RawMaintenance {
    pub record_id: Option<String>,
    pub bike_id: Option<String>,
    pub bike_type: Option<String>,
    pub date: Option<String>,
    pub maintenance_type: Option<String>,
    pub cost: Option<String>,
    pub description: Option<String>,
}
