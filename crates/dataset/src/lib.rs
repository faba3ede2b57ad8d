//! # CityBike Dataset Crate
//!
//! This crate is the pipeline's only point of contact with the CSV files on disk.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** Raw exports are read leniently (every column is an optional string),
//!   turned into strongly typed `core-types` records by the `cleaning` rules, and
//!   written back as cleaned tables that later stages load directly.
//! - **Pure cleaning:** The `cleaning` functions never touch the filesystem, so they can
//!   be tested on in-memory rows.
//!
//! ## Public API
//!
//! - `CsvRepository`: loads raw tables, runs the cleaning step, exports and reloads the
//!   cleaned tables.
//! - `clean_trips`, `clean_stations`, `clean_maintenance`: the cleaning rules.
//! - `CleaningSummary`: per-table row counts before and after cleaning.
//! - `DatasetError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod cleaning;
pub mod error;
pub mod raw;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use cleaning::{CleaningSummary, clean_maintenance, clean_stations, clean_trips};
pub use error::DatasetError;
pub use raw::{RawMaintenance, RawStation, RawTrip};
pub use repository::{CleanedTables, CsvRepository, RawTables};
