use crate::cleaning::{CleaningSummary, clean_maintenance, clean_stations, clean_trips};
use crate::error::DatasetError;
use crate::raw::{RawMaintenance, RawStation, RawTrip};
use configuration::DataSettings;
use core_types::{CoreError, MaintenanceRecord, Station, Trip};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub const TRIPS_FILE: &str = "trips.csv";
pub const STATIONS_FILE: &str = "stations.csv";
pub const MAINTENANCE_FILE: &str = "maintenance.csv";
pub const TRIPS_CLEANED_FILE: &str = "trips_cleaned.csv";
pub const STATIONS_CLEANED_FILE: &str = "stations_cleaned.csv";
pub const MAINTENANCE_CLEANED_FILE: &str = "maintenance_cleaned.csv";

/// The three raw exports, exactly as read from disk.
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub trips: Vec<RawTrip>,
    pub stations: Vec<RawStation>,
    pub maintenance: Vec<RawMaintenance>,
}

/// The cleaned tables plus the row counts of the cleaning step.
#[derive(Debug, Clone, Default)]
pub struct CleanedTables {
    pub trips: Vec<Trip>,
    pub stations: Vec<Station>,
    pub maintenance: Vec<MaintenanceRecord>,
    pub summaries: Vec<CleaningSummary>,
}

impl CleanedTables {
    /// Applies the cleaning rules to every raw table.
    pub fn from_raw(raw: &RawTables) -> Self {
        let trips = clean_trips(&raw.trips);
        let stations = clean_stations(&raw.stations);
        let maintenance = clean_maintenance(&raw.maintenance);

        let summaries = vec![
            CleaningSummary::new("trips", raw.trips.len(), trips.len()),
            CleaningSummary::new("stations", raw.stations.len(), stations.len()),
            CleaningSummary::new("maintenance", raw.maintenance.len(), maintenance.len()),
        ];

        Self {
            trips,
            stations,
            maintenance,
            summaries,
        }
    }
}

/// File-backed access to the raw and cleaned tables.
#[derive(Debug, Clone)]
pub struct CsvRepository {
    raw_dir: PathBuf,
    cleaned_dir: PathBuf,
}

impl CsvRepository {
    pub fn new(raw_dir: impl Into<PathBuf>, cleaned_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            cleaned_dir: cleaned_dir.into(),
        }
    }

    pub fn from_settings(settings: &DataSettings) -> Self {
        Self::new(&settings.raw_dir, &settings.cleaned_dir)
    }

    /// Reads `trips.csv`, `stations.csv` and `maintenance.csv` from the raw directory.
    ///
    /// Rows may be shorter than the header; the missing trailing cells read as `None`.
    pub fn load_raw(&self) -> Result<RawTables, DatasetError> {
        Ok(RawTables {
            trips: read_csv(&self.raw_dir.join(TRIPS_FILE), Rows::Ragged)?,
            stations: read_csv(&self.raw_dir.join(STATIONS_FILE), Rows::Ragged)?,
            maintenance: read_csv(&self.raw_dir.join(MAINTENANCE_FILE), Rows::Ragged)?,
        })
    }

    /// Loads the raw tables, cleans them and writes the cleaned tables.
    pub fn clean(&self) -> Result<CleanedTables, DatasetError> {
        let raw = self.load_raw()?;
        let cleaned = CleanedTables::from_raw(&raw);
        self.export_cleaned(&cleaned)?;
        Ok(cleaned)
    }

    /// Writes the three `*_cleaned.csv` files, creating the directory if needed.
    pub fn export_cleaned(&self, tables: &CleanedTables) -> Result<(), DatasetError> {
        fs::create_dir_all(&self.cleaned_dir).map_err(|source| DatasetError::Io {
            path: self.cleaned_dir.clone(),
            source,
        })?;

        write_csv(&self.cleaned_dir.join(TRIPS_CLEANED_FILE), &tables.trips)?;
        write_csv(&self.cleaned_dir.join(STATIONS_CLEANED_FILE), &tables.stations)?;
        write_csv(&self.cleaned_dir.join(MAINTENANCE_CLEANED_FILE), &tables.maintenance)?;

        tracing::info!(directory = %self.cleaned_dir.display(), "exported cleaned tables");
        Ok(())
    }

    /// Paths of the cleaned trips, stations and maintenance tables, in that order.
    pub fn cleaned_paths(&self) -> [PathBuf; 3] {
        [
            self.cleaned_dir.join(TRIPS_CLEANED_FILE),
            self.cleaned_dir.join(STATIONS_CLEANED_FILE),
            self.cleaned_dir.join(MAINTENANCE_CLEANED_FILE),
        ]
    }

    pub fn load_trips(&self) -> Result<Vec<Trip>, DatasetError> {
        let path = self.cleaned_dir.join(TRIPS_CLEANED_FILE);
        let trips: Vec<Trip> = read_csv(&path, Rows::Strict)?;
        check_all(&path, &trips, Trip::validate)?;
        Ok(trips)
    }

    pub fn load_stations(&self) -> Result<Vec<Station>, DatasetError> {
        let path = self.cleaned_dir.join(STATIONS_CLEANED_FILE);
        let stations: Vec<Station> = read_csv(&path, Rows::Strict)?;
        check_all(&path, &stations, Station::validate)?;
        Ok(stations)
    }

    pub fn load_maintenance(&self) -> Result<Vec<MaintenanceRecord>, DatasetError> {
        let path = self.cleaned_dir.join(MAINTENANCE_CLEANED_FILE);
        let records: Vec<MaintenanceRecord> = read_csv(&path, Rows::Strict)?;
        check_all(&path, &records, MaintenanceRecord::validate)?;
        Ok(records)
    }
}

/// How strictly a table's row lengths are checked against its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rows {
    /// Every row has exactly as many fields as the header.
    Strict,
    /// Rows may have fewer or more fields; raw exports are not trusted.
    Ragged,
}

fn read_csv<T: DeserializeOwned>(path: &Path, rows: Rows) -> Result<Vec<T>, DatasetError> {
    let csv_error = |source: csv::Error| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(rows == Rows::Ragged)
        .from_path(path)
        .map_err(csv_error)?;
    let records = reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(csv_error)?;

    tracing::debug!(path = %path.display(), rows = records.len(), ?rows, "read csv");
    Ok(records)
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), DatasetError> {
    let csv_error = |source: csv::Error| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn check_all<T>(
    path: &Path,
    records: &[T],
    validate: impl Fn(&T) -> Result<(), CoreError>,
) -> Result<(), DatasetError> {
    records
        .iter()
        .try_for_each(&validate)
        .map_err(|source| DatasetError::InvalidRecord {
            path: path.to_path_buf(),
            source,
        })
}
