//! # CityBike Analytics Engine
//!
//! This crate turns the cleaned trip, station and maintenance tables into the
//! business report of the bike-share system: station popularity, temporal demand,
//! customer behaviour, fleet utilization, maintenance spend and data-quality
//! anomalies.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** Apart from the `export` module, nothing here touches the
//!   filesystem. The engine takes borrowed records as input and produces an
//!   `AnalyticsReport` as output.
//! - **Deterministic Rankings:** Every ranking orders by count descending and breaks
//!   ties by key ascending, using the hand-written merge sort from `algorithms`.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The stateless calculator.
//! - `AnalyticsInput`: The borrowed tables the engine reads.
//! - `AnalyticsReport`: All metrics of a run.
//! - `stats`: Descriptive statistics over plain `f64` samples.
//! - `export`: Writes the report tables and the text summary.

pub mod engine;
pub mod error;
pub mod export;
pub mod report;
pub mod stats;

pub use engine::{AnalyticsEngine, AnalyticsInput};
pub use error::AnalyticsError;
pub use export::{DataSources, export_report, render_summary};
pub use report::{
    AnalyticsReport, CompletionRate, CountEntry, GroupValue, MaintenanceSummary, MonthlyTrend,
    OutlierTrip, StationActivity,
};
pub use stats::{DistanceMatrix, SummaryStats};
