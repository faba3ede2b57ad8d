//! # CityBike Charts
//!
//! Renders the figures of the analytics report as PNG files: the busiest start
//! stations, the monthly trip volume, the trip duration distribution and trip
//! durations per user type.
//!
//! ## Public API
//!
//! - `render_charts`: Draws all four charts into the configured directory.
//! - `histogram`: The equal-width binning behind the duration histogram.

pub mod error;
pub mod render;

pub use error::ChartError;
pub use render::{
    DURATION_BY_USER_TYPE_CHART, DURATION_HISTOGRAM_CHART, Histogram, MONTHLY_TREND_CHART,
    TOP_STATIONS_CHART, histogram, render_charts,
};
