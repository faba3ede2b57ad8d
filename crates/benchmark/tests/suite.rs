use benchmark::{BenchmarkError, BenchmarkHarness, Operation, run_fleet_suite};
use chrono::NaiveDate;
use configuration::BenchmarkSettings;
use core_types::{BikeType, Station, Trip, TripStatus, UserType};
use fleet::Fleet;
use indicatif::ProgressBar;
use rust_decimal::Decimal;

fn fleet() -> Fleet {
    let start = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(7, 0, 0)
        .unwrap();

    let stations = (0..50)
        .map(|i| Station::new(format!("ST{:03}", (i * 37) % 50), format!("Station {i}"), 10, 52.0, 13.0).unwrap())
        .collect();
    let trips = (0..200)
        .map(|i| Trip {
            trip_id: format!("T{i}"),
            user_id: format!("U{}", i % 7),
            user_type: UserType::Member,
            bike_id: format!("B{}", i % 11),
            bike_type: BikeType::Electric,
            start_station_id: format!("ST{:03}", i % 50),
            end_station_id: format!("ST{:03}", (i + 1) % 50),
            start_time: start,
            end_time: start + chrono::Duration::minutes(15),
            duration_minutes: Decimal::from(15),
            // Plenty of equal distances so stability matters.
            distance_km: Decimal::new((i * 13 % 17) as i64, 1),
            status: TripStatus::Completed,
        })
        .collect();

    Fleet::new(stations, trips, Vec::new())
}

fn settings(query: &str) -> BenchmarkSettings {
    BenchmarkSettings {
        sort_runs: 2,
        search_runs: 20,
        search_query: query.to_string(),
    }
}

#[test]
fn fleet_suite_runs_every_case_and_agrees() {
    let fleet = fleet();
    let progress = ProgressBar::hidden();

    let cases = run_fleet_suite(&fleet, &settings(" st017 "), &progress).unwrap();

    let names: Vec<_> = cases.iter().map(|c| c.name).collect();
    assert_eq!(names, ["trip distance sort", "station id search", "station id sort + search"]);
    assert_eq!(cases[0].result.operation(), Operation::Sort);
    assert_eq!(cases[0].result.records_processed(), 200);
    assert_eq!(cases[0].result.runs(), 2);
    assert_eq!(cases[1].result.runs(), 20);
    assert!(cases.iter().all(|c| c.result.outputs_equal()));
    assert_eq!(progress.position(), 3);
}

#[test]
fn fleet_suite_agrees_when_station_is_missing() {
    let cases = run_fleet_suite(&fleet(), &settings("ST999"), &ProgressBar::hidden()).unwrap();
    assert!(cases.iter().all(|c| c.result.outputs_equal()));
}

#[test]
fn fleet_suite_rejects_zero_runs() {
    let settings = BenchmarkSettings {
        search_runs: 0,
        ..settings("ST001")
    };
    let result = run_fleet_suite(&fleet(), &settings, &ProgressBar::hidden());
    assert!(matches!(result, Err(BenchmarkError::InvalidRuns(0))));
}

#[test]
fn results_serialize_with_readable_durations() {
    let harness = BenchmarkHarness::new(1).unwrap();
    let result = harness.compare(&[5, 3, 5, 1], |v| *v, &5);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["operation"], "sort_and_search");
    assert_eq!(json["records_processed"], 4);
    assert_eq!(json["outputs_equal"], true);
    assert!(json["custom_elapsed"].is_string());
    assert_eq!(json["optimized_build"], !cfg!(debug_assertions));
}

#[test]
fn results_flag_debug_build_timings() {
    let cases = run_fleet_suite(&fleet(), &settings("ST001"), &ProgressBar::hidden()).unwrap();
    assert!(cases
        .iter()
        .all(|c| c.result.optimized_build() == !cfg!(debug_assertions)));
}
