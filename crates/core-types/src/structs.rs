use crate::enums::{BikeType, TripStatus, UserType};
use crate::error::CoreError;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A docking station where trips start and end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station_id: String,
    #[serde(rename = "station_name")]
    pub name: String,
    pub capacity: u32,
    pub latitude: f64,
    pub longitude: f64,
}

impl Station {
    /// Creates a new `Station`, rejecting empty capacity and out-of-range coordinates.
    pub fn new(
        station_id: impl Into<String>,
        name: impl Into<String>,
        capacity: u32,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, CoreError> {
        let station = Self {
            station_id: station_id.into(),
            name: name.into(),
            capacity,
            latitude,
            longitude,
        };
        station.validate()?;
        Ok(station)
    }

    /// Checks the invariants `new` enforces, for stations built by deserialization.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.capacity == 0 {
            return Err(CoreError::InvalidInput(
                "capacity".to_string(),
                "must be positive".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CoreError::InvalidInput(
                "latitude".to_string(),
                format!("{} is outside [-90, 90]", self.latitude),
            ));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CoreError::InvalidInput(
                "longitude".to_string(),
                format!("{} is outside [-180, 180]", self.longitude),
            ));
        }
        Ok(())
    }

    /// A stand-in for a station that trips reference but the station table lacks.
    pub fn placeholder(station_id: &str) -> Self {
        Self {
            station_id: station_id.to_string(),
            name: format!("Station {station_id}"),
            capacity: 1,
            latitude: 0.0,
            longitude: 0.0,
        }
    }
}

/// A single rental, from undocking to docking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trip {
    pub trip_id: String,
    pub user_id: String,
    pub user_type: UserType,
    pub bike_id: String,
    pub bike_type: BikeType,
    pub start_station_id: String,
    pub end_station_id: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_minutes: Decimal,
    pub distance_km: Decimal,
    pub status: TripStatus,
}

impl Trip {
    /// Checks the business rules every cleaned trip must satisfy.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.end_time < self.start_time {
            return Err(CoreError::InvalidInput(
                format!("trip {}", self.trip_id),
                "end time is before start time".to_string(),
            ));
        }
        if self.duration_minutes.is_sign_negative() && !self.duration_minutes.is_zero() {
            return Err(CoreError::InvalidInput(
                format!("trip {}", self.trip_id),
                "duration must not be negative".to_string(),
            ));
        }
        if self.distance_km.is_sign_negative() && !self.distance_km.is_zero() {
            return Err(CoreError::InvalidInput(
                format!("trip {}", self.trip_id),
                "distance must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// The station pair of this trip, formatted as `"START -> END"`.
    pub fn route(&self) -> String {
        format!("{} -> {}", self.start_station_id, self.end_station_id)
    }

    /// Elapsed minutes between the two timestamps, ignoring the stored duration.
    pub fn elapsed_minutes(&self) -> Decimal {
        let seconds = (self.end_time - self.start_time).num_seconds();
        Decimal::from(seconds) / Decimal::from(60)
    }
}

/// One maintenance intervention on a bike.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub record_id: String,
    pub bike_id: String,
    pub bike_type: BikeType,
    pub date: NaiveDateTime,
    pub maintenance_type: String,
    pub cost: Decimal,
    pub description: String,
}

impl MaintenanceRecord {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.cost.is_sign_negative() && !self.cost.is_zero() {
            return Err(CoreError::InvalidInput(
                format!("maintenance record {}", self.record_id),
                "cost must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn trip() -> Trip {
        Trip {
            trip_id: "T1".to_string(),
            user_id: "U1".to_string(),
            user_type: UserType::Member,
            bike_id: "B1".to_string(),
            bike_type: BikeType::Classic,
            start_station_id: "ST1".to_string(),
            end_station_id: "ST2".to_string(),
            start_time: at(8, 0),
            end_time: at(8, 30),
            duration_minutes: dec!(30),
            distance_km: dec!(4.2),
            status: TripStatus::Completed,
        }
    }

    #[test]
    fn station_rejects_invalid_fields() {
        assert!(Station::new("ST1", "Main", 0, 1.0, 1.0).is_err());
        assert!(Station::new("ST1", "Main", 5, 91.0, 1.0).is_err());
        assert!(Station::new("ST1", "Main", 5, 1.0, -181.0).is_err());
        assert!(Station::new("ST1", "Main", 5, 52.5, 13.4).is_ok());
    }

    #[test]
    fn deserialized_station_is_revalidated() {
        let mut station = Station::new("ST1", "Main", 5, 52.5, 13.4).unwrap();
        assert!(station.validate().is_ok());

        station.latitude = 200.0;
        assert!(station.validate().is_err());

        station.latitude = 52.5;
        station.capacity = 0;
        assert!(station.validate().is_err());
    }

    #[test]
    fn placeholder_station_is_named_after_its_id() {
        let station = Station::placeholder("ST9");
        assert_eq!(station.name, "Station ST9");
        assert_eq!(station.capacity, 1);
    }

    #[test]
    fn trip_validation_and_helpers() {
        let mut t = trip();
        assert!(t.validate().is_ok());
        assert_eq!(t.route(), "ST1 -> ST2");
        assert_eq!(t.elapsed_minutes(), dec!(30));

        t.end_time = at(7, 0);
        assert!(t.validate().is_err());

        let mut t = trip();
        t.distance_km = dec!(-1);
        assert!(t.validate().is_err());
    }

    #[test]
    fn maintenance_rejects_negative_cost() {
        let record = MaintenanceRecord {
            record_id: "M1".to_string(),
            bike_id: "B1".to_string(),
            bike_type: BikeType::Electric,
            date: at(9, 0),
            maintenance_type: "brakes".to_string(),
            cost: dec!(-5),
            description: String::new(),
        };
        assert!(record.validate().is_err());
    }
}
