//! # CityBike Benchmark Harness
//!
//! Measures the hand-written merge sort and binary search of the `algorithms`
//! crate against the standard library on the same inputs, and checks that both
//! paths agree.
//!
//! ## Public API
//!
//! - `BenchmarkHarness`: Times one operation pair, averaged over a fixed number of runs.
//! - `BenchmarkResult`: Timings, record count and the agreement flag of one comparison.
//! - `run_fleet_suite`: The trip-sort and station-search benchmarks over a loaded `Fleet`.

pub mod error;
pub mod harness;
pub mod suite;

pub use error::BenchmarkError;
pub use harness::{BenchmarkHarness, BenchmarkResult, Operation};
pub use suite::{BenchmarkCase, run_fleet_suite};
