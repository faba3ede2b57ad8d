use crate::error::AnalyticsError;
use crate::report::{AnalyticsReport, CountEntry, GroupValue};
use itertools::Itertools;
use serde::Serialize;
use std::fmt::{Display, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

pub const TOP_STATIONS_FILE: &str = "top_stations.csv";
pub const TOP_USERS_FILE: &str = "top_users.csv";
pub const MAINTENANCE_SUMMARY_FILE: &str = "maintenance_summary.csv";
pub const SUMMARY_REPORT_FILE: &str = "summary_report.txt";

/// The tables a report was calculated from, listed at the top of the summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSources {
    pub trips: PathBuf,
    pub stations: PathBuf,
    pub maintenance: PathBuf,
}

#[derive(Serialize)]
struct UserRow<'a> {
    user_id: &'a str,
    trip_count: usize,
}

/// Writes the ranking tables and the text summary into `output_dir`, creating it
/// if needed, and returns the written paths.
pub fn export_report(
    report: &AnalyticsReport,
    sources: &DataSources,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, AnalyticsError> {
    fs::create_dir_all(output_dir).map_err(|source| AnalyticsError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let top_stations = output_dir.join(TOP_STATIONS_FILE);
    write_csv(&top_stations, &report.top_stations)?;

    let top_users = output_dir.join(TOP_USERS_FILE);
    let user_rows: Vec<UserRow<'_>> = report
        .top_users
        .iter()
        .map(|e| UserRow {
            user_id: &e.key,
            trip_count: e.count,
        })
        .collect();
    write_csv(&top_users, &user_rows)?;

    let maintenance_summary = output_dir.join(MAINTENANCE_SUMMARY_FILE);
    write_csv(&maintenance_summary, &report.maintenance_summary)?;

    let mut tables = vec![top_stations, top_users, maintenance_summary];

    let mut summary = render_summary(report, sources);
    summary.push_str("\nExported tables:\n");
    for table in &tables {
        let _ = writeln!(summary, "- {}", table.display());
    }
    let summary_path = output_dir.join(SUMMARY_REPORT_FILE);
    fs::write(&summary_path, summary).map_err(|source| AnalyticsError::Io {
        path: summary_path.clone(),
        source,
    })?;
    tables.push(summary_path);

    tracing::info!(directory = %output_dir.display(), files = tables.len(), "exported report");
    Ok(tables)
}

/// Renders the human-readable summary of a report.
pub fn render_summary(report: &AnalyticsReport, sources: &DataSources) -> String {
    let mut out = String::new();
    // Writing into a `String` cannot fail.
    let _ = write_summary(&mut out, report, sources);
    out
}

fn write_summary(out: &mut String, r: &AnalyticsReport, sources: &DataSources) -> std::fmt::Result {
    writeln!(out, "CityBike Analytics Summary Report")?;
    writeln!(out, "================================")?;
    writeln!(out)?;

    writeln!(out, "Data sources:")?;
    writeln!(out, "- Trips: {}", sources.trips.display())?;
    writeln!(out, "- Stations: {}", sources.stations.display())?;
    writeln!(out, "- Maintenance: {}", sources.maintenance.display())?;
    writeln!(out)?;

    writeln!(out, "1) Core KPIs")?;
    writeln!(out, "- Total trips: {}", r.total_trips)?;
    writeln!(out, "- Total distance (km): {:.2}", r.total_distance_km)?;
    writeln!(out, "- Average trip duration (min): {}", or_na(r.average_duration_minutes))?;
    writeln!(out)?;

    writeln!(out, "2) Station popularity")?;
    writeln!(out, "- Top start station: {}", leader(&r.top_start_stations))?;
    writeln!(out, "- Top end station: {}", leader(&r.top_end_stations))?;
    writeln!(out)?;

    writeln!(out, "3) Temporal demand")?;
    match r.peak_hour {
        Some(hour) => writeln!(out, "- Peak usage hour: {hour}:00")?,
        None => writeln!(out, "- Peak usage hour: N/A")?,
    }
    match &r.busiest_weekday {
        Some(day) => writeln!(out, "- Highest trip-volume weekday: {} ({} trips)", day.key, day.count)?,
        None => writeln!(out, "- Highest trip-volume weekday: N/A")?,
    }
    writeln!(out)?;

    writeln!(out, "4) Customer and behavior insights")?;
    writeln!(out, "- Avg distance by user type: {}", groups(&r.average_distance_by_user_type))?;
    writeln!(out, "- Avg trips per user by user type: {}", groups(&r.average_trips_per_user))?;
    writeln!(out)?;

    writeln!(out, "5) Fleet and utilization")?;
    writeln!(out, "- Bike utilization rate (approx): {}", percent_or_na(r.bike_utilization_pct))?;
    match r.maintenance_frequency.first() {
        Some(bike) => writeln!(out, "- Most maintained bike: {} ({} records)", bike.key, bike.count)?,
        None => writeln!(out, "- Most maintained bike: N/A")?,
    }
    writeln!(out)?;

    writeln!(out, "6) Growth and retention")?;
    let trend = &r.monthly_trend;
    writeln!(out, "- Monthly trend growing: {}", trend.growing)?;
    match trend.slope {
        Some(slope) => writeln!(out, "- Monthly trend slope: {slope:.3}")?,
        None => writeln!(out, "- Monthly trend slope: N/A")?,
    }
    writeln!(
        out,
        "- Completion rate: {} (Completed={}, Cancelled={})",
        percent_or_na(r.completion.rate_pct),
        r.completion.completed,
        r.completion.cancelled
    )?;
    writeln!(out)?;

    writeln!(out, "7) Business hotspots")?;
    writeln!(out, "- Top active user: {}", leader_with_trips(&r.top_users))?;
    writeln!(out, "- Top route: {}", leader_with_trips(&r.top_routes))?;
    writeln!(out)?;

    writeln!(out, "8) Maintenance spend")?;
    writeln!(out, "- Maintenance cost by bike type: {}", groups(&r.maintenance_cost_by_bike_type))?;
    writeln!(out)?;

    writeln!(out, "9) Data quality / anomalies")?;
    writeln!(out, "- Outlier trips detected (z-score on duration/distance): {}", r.outlier_count)?;
    Ok(())
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), AnalyticsError> {
    let csv_error = |source: csv::Error| AnalyticsError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| AnalyticsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn or_na(value: Option<rust_decimal::Decimal>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

fn percent_or_na(value: Option<rust_decimal::Decimal>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}%"))
}

fn leader(entries: &[CountEntry]) -> String {
    entries.first().map_or_else(|| "N/A".to_string(), |e| e.key.clone())
}

fn leader_with_trips(entries: &[CountEntry]) -> String {
    entries
        .first()
        .map_or_else(|| "N/A".to_string(), |e| format!("{} ({} trips)", e.key, e.count))
}

fn groups<K: Display>(values: &[GroupValue<K>]) -> String {
    let body = values
        .iter()
        .map(|g| format!("{}: {:.2}", g.key, g.value))
        .join(", ");
    format!("{{{body}}}")
}
