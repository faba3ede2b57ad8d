//! # CityBike Fleet
//!
//! The in-memory view of the bike-share system: stations, trips and maintenance
//! records loaded from the cleaned tables, plus the lookups the rest of the
//! application runs against them.
//!
//! Every ordering and lookup comes in two flavours: the hand-written one from the
//! `algorithms` crate and a `*_reference` one built on the standard library, so the
//! two can be compared side by side.

pub mod error;

pub use error::FleetError;

use algorithms::{SortOrder, find_by_key, merge_sort_by_key, merge_sort_by_key_ordered};
use core_types::{MaintenanceRecord, Station, Trip};
use dataset::CsvRepository;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;

/// The station attribute a search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationField {
    Id,
    Name,
}

impl StationField {
    /// The normalized (trimmed, lower-cased) search key of a station.
    pub fn key(&self, station: &Station) -> String {
        let raw = match self {
            StationField::Id => &station.station_id,
            StationField::Name => &station.name,
        };
        normalize(raw)
    }
}

impl FromStr for StationField {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" | "station_id" => Ok(StationField::Id),
            "name" | "station_name" => Ok(StationField::Name),
            other => Err(FleetError::InvalidSearchField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Fleet {
    stations: Vec<Station>,
    trips: Vec<Trip>,
    maintenance: Vec<MaintenanceRecord>,
}

impl Fleet {
    /// Builds a fleet, adding a placeholder for every station that trips
    /// reference but the station table does not contain.
    pub fn new(
        mut stations: Vec<Station>,
        trips: Vec<Trip>,
        maintenance: Vec<MaintenanceRecord>,
    ) -> Self {
        let mut known: HashSet<String> = stations.iter().map(|s| s.station_id.clone()).collect();

        for trip in &trips {
            for station_id in [&trip.start_station_id, &trip.end_station_id] {
                if known.insert(station_id.clone()) {
                    tracing::debug!(station_id = %station_id, "adding placeholder station");
                    stations.push(Station::placeholder(station_id));
                }
            }
        }

        Self {
            stations,
            trips,
            maintenance,
        }
    }

    /// Loads the cleaned stations, trips and maintenance records.
    pub fn from_repository(repository: &CsvRepository) -> Result<Self, FleetError> {
        let fleet = Self::new(
            repository.load_stations()?,
            repository.load_trips()?,
            repository.load_maintenance()?,
        );
        tracing::info!(
            stations = fleet.stations.len(),
            trips = fleet.trips.len(),
            maintenance = fleet.maintenance.len(),
            "fleet loaded"
        );
        Ok(fleet)
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn maintenance(&self) -> &[MaintenanceRecord] {
        &self.maintenance
    }

    /// Total kilometres ridden across all trips.
    pub fn total_distance(&self) -> Decimal {
        self.trips.iter().map(|t| t.distance_km).sum()
    }

    /// Trips ordered by distance with the hand-written merge sort.
    pub fn sort_trips_by_distance(&self, order: SortOrder) -> Vec<Trip> {
        merge_sort_by_key_ordered(&self.trips, |t| t.distance_km, order)
    }

    /// Trips ordered by distance with the standard library's stable sort.
    pub fn sort_trips_by_distance_reference(&self, order: SortOrder) -> Vec<Trip> {
        let mut trips = self.trips.clone();
        match order {
            SortOrder::Ascending => trips.sort_by(|a, b| a.distance_km.cmp(&b.distance_km)),
            SortOrder::Descending => trips.sort_by(|a, b| b.distance_km.cmp(&a.distance_km)),
        }
        trips
    }

    /// Finds a station by id or name, ignoring surrounding whitespace and case.
    ///
    /// Stations are ordered by the normalized key with the merge sort and then
    /// binary searched. When several stations share the key, the first one in
    /// station-table order is returned.
    pub fn search_station(&self, query: &str, field: StationField) -> Option<&Station> {
        if self.stations.is_empty() {
            return None;
        }

        let by_key: Vec<&Station> = self.stations.iter().collect();
        let sorted = merge_sort_by_key(&by_key, |s| field.key(s));
        find_by_key(&sorted, &normalize(query), |s| field.key(s)).copied()
    }

    /// Finds a station with a linear scan over the unsorted station table.
    pub fn search_station_reference(&self, query: &str, field: StationField) -> Option<&Station> {
        let query = normalize(query);
        self.stations.iter().find(|s| field.key(s) == query)
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{BikeType, TripStatus, UserType};
    use rust_decimal_macros::dec;

    fn station(id: &str, name: &str) -> Station {
        Station::new(id, name, 10, 52.5, 13.4).unwrap()
    }

    fn trip(id: &str, from: &str, to: &str, distance_km: Decimal) -> Trip {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        Trip {
            trip_id: id.to_string(),
            user_id: "U1".to_string(),
            user_type: UserType::Member,
            bike_id: "B1".to_string(),
            bike_type: BikeType::Classic,
            start_station_id: from.to_string(),
            end_station_id: to.to_string(),
            start_time: start,
            end_time: start + chrono::Duration::minutes(20),
            duration_minutes: dec!(20),
            distance_km,
            status: TripStatus::Completed,
        }
    }

    fn fleet() -> Fleet {
        Fleet::new(
            vec![station("ST2", "Zoo"), station("ST1", "Alexanderplatz"), station("ST3", "zoo")],
            vec![
                trip("T1", "ST1", "ST2", dec!(3.0)),
                trip("T2", "ST2", "ST9", dec!(1.5)),
                trip("T3", "ST1", "ST3", dec!(3.0)),
                trip("T4", "ST3", "ST1", dec!(0.5)),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn unknown_trip_stations_get_placeholders() {
        let fleet = fleet();
        assert_eq!(fleet.stations().len(), 4);
        let placeholder = fleet.search_station("st9", StationField::Id).unwrap();
        assert_eq!(placeholder.name, "Station ST9");
    }

    #[test]
    fn total_distance_sums_all_trips() {
        assert_eq!(fleet().total_distance(), dec!(8.0));
    }

    #[test]
    fn distance_sort_is_stable_in_both_directions() {
        let fleet = fleet();

        let ids = |trips: Vec<Trip>| trips.into_iter().map(|t| t.trip_id).collect::<Vec<_>>();
        assert_eq!(ids(fleet.sort_trips_by_distance(SortOrder::Ascending)), ["T4", "T2", "T1", "T3"]);
        assert_eq!(ids(fleet.sort_trips_by_distance(SortOrder::Descending)), ["T1", "T3", "T2", "T4"]);

        for order in [SortOrder::Ascending, SortOrder::Descending] {
            assert_eq!(
                fleet.sort_trips_by_distance(order),
                fleet.sort_trips_by_distance_reference(order)
            );
        }
        // The fleet itself keeps its load order.
        assert_eq!(fleet.trips()[0].trip_id, "T1");
    }

    #[test]
    fn station_search_normalizes_and_prefers_first_match() {
        let fleet = fleet();

        let found = fleet.search_station("  st1 ", StationField::Id).unwrap();
        assert_eq!(found.name, "Alexanderplatz");

        // "Zoo" and "zoo" share a key; the first in table order wins.
        let zoo = fleet.search_station("ZOO", StationField::Name).unwrap();
        assert_eq!(zoo.station_id, "ST2");
        assert_eq!(fleet.search_station_reference("ZOO", StationField::Name), Some(zoo));

        assert!(fleet.search_station("ST100", StationField::Id).is_none());
        assert!(fleet.search_station_reference("ST100", StationField::Id).is_none());
    }

    #[test]
    fn empty_fleet_finds_nothing() {
        let fleet = Fleet::default();
        assert!(fleet.search_station("ST1", StationField::Id).is_none());
        assert!(fleet.sort_trips_by_distance(SortOrder::Ascending).is_empty());
    }

    #[test]
    fn search_field_parsing() {
        assert_eq!("station_id".parse::<StationField>().unwrap(), StationField::Id);
        assert_eq!("name".parse::<StationField>().unwrap(), StationField::Name);
        assert!(matches!(
            "capacity".parse::<StationField>(),
            Err(FleetError::InvalidSearchField(field)) if field == "capacity"
        ));
    }
}
