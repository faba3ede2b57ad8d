use crate::error::BenchmarkError;
use crate::harness::{BenchmarkHarness, BenchmarkResult};
use algorithms::merge_sort_by_key;
use configuration::BenchmarkSettings;
use fleet::{Fleet, StationField};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// One named measurement of the fleet suite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkCase {
    pub name: &'static str,
    pub result: BenchmarkResult,
}

/// Benchmarks the fleet's hot paths: sorting trips by distance and looking up a
/// station by id.
pub fn run_fleet_suite(
    fleet: &Fleet,
    settings: &BenchmarkSettings,
    progress: &ProgressBar,
) -> Result<Vec<BenchmarkCase>, BenchmarkError> {
    let sort_harness = BenchmarkHarness::new(settings.sort_runs)?;
    let search_harness = BenchmarkHarness::new(settings.search_runs)?;

    let station_key = |s: &core_types::Station| StationField::Id.key(s);
    let query = settings.search_query.trim().to_lowercase();
    let ordered_stations = merge_sort_by_key(fleet.stations(), station_key);

    progress.set_length(3);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let mut cases = Vec::with_capacity(3);
    let mut record = |name: &'static str, result: BenchmarkResult| {
        tracing::info!(
            case = name,
            custom = ?result.custom_elapsed(),
            reference = ?result.reference_elapsed(),
            outputs_equal = result.outputs_equal(),
            "benchmark case finished"
        );
        progress.inc(1);
        cases.push(BenchmarkCase { name, result });
    };

    progress.set_message("trip distance sort");
    record(
        "trip distance sort",
        sort_harness.compare_sort(fleet.trips(), |t| t.distance_km),
    );

    progress.set_message("station id search");
    record(
        "station id search",
        search_harness.compare_search(&ordered_stations, station_key, &query),
    );

    progress.set_message("station id sort + search");
    record(
        "station id sort + search",
        sort_harness.compare(fleet.stations(), station_key, &query),
    );

    progress.finish_with_message("done");
    Ok(cases)
}
