use crate::error::AnalyticsError;
use crate::report::{
    AnalyticsReport, CompletionRate, CountEntry, GroupValue, MaintenanceSummary, MonthlyTrend,
    OutlierTrip, StationActivity,
};
use crate::stats;
use algorithms::{merge_sort_by, merge_sort_by_key};
use chrono::{Datelike, Timelike, Weekday};
use configuration::ReportSettings;
use core_types::{MaintenanceRecord, Station, Trip, TripStatus};
use itertools::Itertools;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// The borrowed tables an analytics run reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsInput<'a> {
    pub trips: &'a [Trip],
    pub stations: &'a [Station],
    pub maintenance: &'a [MaintenanceRecord],
}

/// A stateless calculator for deriving the business metrics of the bike-share system.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating the report.
    ///
    /// # Arguments
    ///
    /// * `input` - The cleaned trips, stations and maintenance records.
    /// * `settings` - Ranking sizes and the outlier filter.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AnalyticsReport` or an `AnalyticsError`.
    pub fn calculate(
        &self,
        input: &AnalyticsInput<'_>,
        settings: &ReportSettings,
    ) -> Result<AnalyticsReport, AnalyticsError> {
        let mut report = AnalyticsReport::new();

        // Maintenance and station metrics do not depend on trips.
        self.calculate_maintenance(input.maintenance, settings, &mut report);
        report.station_distances = stats::station_distance_matrix(input.stations);

        if input.trips.is_empty() {
            tracing::warn!("no trips to analyse, trip metrics are left empty");
            return Ok(report);
        }

        self.calculate_core(input.trips, &mut report);
        self.calculate_station_popularity(input.trips, settings, &mut report);
        self.calculate_temporal_demand(input.trips, &mut report);
        self.calculate_customers(input.trips, settings, &mut report);
        self.calculate_utilization(input.trips, &mut report);
        self.calculate_numerics(input.trips, settings, &mut report)?;

        tracing::info!(
            trips = report.total_trips,
            outliers = report.outlier_count,
            "analytics report calculated"
        );
        Ok(report)
    }

    fn calculate_core(&self, trips: &[Trip], report: &mut AnalyticsReport) {
        report.total_trips = trips.len();
        report.total_distance_km = trips.iter().map(|t| t.distance_km).sum();
        report.average_duration_minutes = decimal_mean(trips.iter().map(|t| t.duration_minutes));
    }

    fn calculate_station_popularity(
        &self,
        trips: &[Trip],
        settings: &ReportSettings,
        report: &mut AnalyticsReport,
    ) {
        let n = settings.top_stations;
        report.top_start_stations = top(rank(trips.iter().map(|t| t.start_station_id.clone())), n);
        report.top_end_stations = top(rank(trips.iter().map(|t| t.end_station_id.clone())), n);

        // Outer join of both rankings on the station id, in id order.
        let mut joined: BTreeMap<&str, StationActivity> = BTreeMap::new();
        for entry in &report.top_start_stations {
            activity(&mut joined, &entry.key).start_trip_count = entry.count;
        }
        for entry in &report.top_end_stations {
            activity(&mut joined, &entry.key).end_trip_count = entry.count;
        }
        report.top_stations = joined.into_values().collect();
    }

    fn calculate_temporal_demand(&self, trips: &[Trip], report: &mut AnalyticsReport) {
        report.trips_by_hour = rank(trips.iter().map(|t| t.start_time.hour()));
        report.peak_hour = report.trips_by_hour.first().map(|e| e.key);

        let mut per_weekday = [0usize; 7];
        for trip in trips {
            per_weekday[trip.start_time.weekday().num_days_from_monday() as usize] += 1;
        }
        report.trips_by_weekday = WEEKDAYS
            .iter()
            .zip(per_weekday)
            .map(|(day, count)| CountEntry {
                key: weekday_name(*day).to_string(),
                count,
            })
            .collect();
        // Ties go to the earliest day of the week.
        report.busiest_weekday = report
            .trips_by_weekday
            .iter()
            .rev()
            .max_by_key(|e| e.count)
            .cloned();

        report.monthly_trend = monthly_trend(trips);
    }

    fn calculate_customers(
        &self,
        trips: &[Trip],
        settings: &ReportSettings,
        report: &mut AnalyticsReport,
    ) {
        let distances = trips.iter().map(|t| (t.user_type, t.distance_km)).into_group_map();
        report.average_distance_by_user_type = rank_values(
            distances
                .into_iter()
                .filter_map(|(key, values)| {
                    decimal_mean(values).map(|value| GroupValue { key, value })
                })
                .collect(),
        );

        let users_per_type = trips
            .iter()
            .map(|t| (t.user_type, t.user_id.as_str()))
            .into_group_map();
        report.average_trips_per_user = rank_values(
            users_per_type
                .into_iter()
                .map(|(key, users)| {
                    let unique = users.iter().unique().count();
                    GroupValue {
                        key,
                        value: Decimal::from(users.len()) / Decimal::from(unique),
                    }
                })
                .collect(),
        );

        report.top_users = top(rank(trips.iter().map(|t| t.user_id.clone())), settings.top_users);
        report.top_routes = top(rank(trips.iter().map(Trip::route)), settings.top_routes);

        let statuses = trips.iter().map(|t| t.status).counts();
        let completed = statuses.get(&TripStatus::Completed).copied().unwrap_or(0);
        let cancelled = statuses.get(&TripStatus::Cancelled).copied().unwrap_or(0);
        report.completion = CompletionRate {
            completed,
            cancelled,
            rate_pct: percentage(Decimal::from(completed), Decimal::from(completed + cancelled)),
        };
    }

    /// Share of the observed period the average bike spent in use.
    fn calculate_utilization(&self, trips: &[Trip], report: &mut AnalyticsReport) {
        let first_start = trips.iter().map(|t| t.start_time).min();
        let last_end = trips.iter().map(|t| t.end_time).max();
        let (Some(first_start), Some(last_end)) = (first_start, last_end) else {
            return;
        };

        let period_minutes = Decimal::from((last_end - first_start).num_seconds()) / Decimal::from(60);
        let bikes = Decimal::from(trips.iter().map(|t| &t.bike_id).unique().count());
        let in_use: Decimal = trips.iter().map(|t| t.duration_minutes).sum();

        report.bike_utilization_pct = percentage(in_use, bikes * period_minutes);
    }

    fn calculate_maintenance(
        &self,
        records: &[MaintenanceRecord],
        settings: &ReportSettings,
        report: &mut AnalyticsReport,
    ) {
        let by_type = records.iter().map(|r| (r.bike_type, r)).into_group_map();

        report.maintenance_cost_by_bike_type = rank_values(
            by_type
                .iter()
                .map(|(bike_type, records)| GroupValue {
                    key: *bike_type,
                    value: records.iter().map(|r| r.cost).sum(),
                })
                .collect(),
        );

        let summary: Vec<MaintenanceSummary> = by_type
            .into_iter()
            .map(|(bike_type, records)| {
                let total_cost: Decimal = records.iter().map(|r| r.cost).sum();
                MaintenanceSummary {
                    bike_type,
                    total_cost,
                    records: records.len(),
                    unique_bikes: records.iter().map(|r| &r.bike_id).unique().count(),
                    avg_cost: total_cost / Decimal::from(records.len()),
                }
            })
            .collect();
        report.maintenance_summary = merge_sort_by_key(&summary, |s| s.bike_type);

        report.maintenance_frequency = top(
            rank(records.iter().map(|r| r.bike_id.clone())),
            settings.top_maintained_bikes,
        );
    }

    /// Summary statistics and z-score outliers of durations and distances.
    fn calculate_numerics(
        &self,
        trips: &[Trip],
        settings: &ReportSettings,
        report: &mut AnalyticsReport,
    ) -> Result<(), AnalyticsError> {
        let durations = to_floats(trips.iter().map(|t| t.duration_minutes), "duration_minutes")?;
        let distances = to_floats(trips.iter().map(|t| t.distance_km), "distance_km")?;

        report.duration_stats = stats::summary_stats(&durations);
        report.distance_stats = stats::summary_stats(&distances);

        let threshold = settings.outlier_z_threshold;
        let outliers: Vec<OutlierTrip> = trips
            .iter()
            .zip(stats::zscores(&durations))
            .zip(stats::zscores(&distances))
            .filter(|((_, dz), sz)| dz.abs() > threshold || sz.abs() > threshold)
            .map(|((trip, duration_z), distance_z)| OutlierTrip {
                trip_id: trip.trip_id.clone(),
                duration_minutes: trip.duration_minutes,
                distance_km: trip.distance_km,
                duration_z,
                distance_z,
                max_abs_z: duration_z.abs().max(distance_z.abs()),
            })
            .collect();

        report.outlier_count = outliers.len();
        report.outliers = merge_sort_by(&outliers, |a, b| b.max_abs_z.total_cmp(&a.max_abs_z));
        report.outliers.truncate(settings.max_outliers);
        Ok(())
    }
}

/// Counts each key and orders the counts descending, ties by key ascending.
fn rank<K>(keys: impl Iterator<Item = K>) -> Vec<CountEntry<K>>
where
    K: Ord + Clone + Hash,
{
    let counts: Vec<CountEntry<K>> = keys
        .counts()
        .into_iter()
        .map(|(key, count)| CountEntry { key, count })
        .collect();
    merge_sort_by_key(&counts, |e| (Reverse(e.count), e.key.clone()))
}

fn rank_values<K: Ord + Copy>(values: Vec<GroupValue<K>>) -> Vec<GroupValue<K>> {
    merge_sort_by_key(&values, |g| (Reverse(g.value), g.key))
}

fn top<K>(mut entries: Vec<CountEntry<K>>, n: usize) -> Vec<CountEntry<K>> {
    entries.truncate(n);
    entries
}

fn activity<'m, 'k>(
    joined: &'m mut BTreeMap<&'k str, StationActivity>,
    station_id: &'k str,
) -> &'m mut StationActivity {
    joined.entry(station_id).or_insert_with(|| StationActivity {
        station_id: station_id.to_string(),
        start_trip_count: 0,
        end_trip_count: 0,
    })
}

fn monthly_trend(trips: &[Trip]) -> MonthlyTrend {
    let month_index = |trip: &Trip| trip.start_time.year() * 12 + trip.start_time.month0() as i32;
    let per_month: HashMap<i32, usize> = trips.iter().map(month_index).counts();

    let (Some(first), Some(last)) = (per_month.keys().min(), per_month.keys().max()) else {
        return MonthlyTrend::default();
    };

    let months: Vec<CountEntry> = (*first..=*last)
        .map(|index| CountEntry {
            key: format!("{:04}-{:02}", index.div_euclid(12), index.rem_euclid(12) + 1),
            count: per_month.get(&index).copied().unwrap_or(0),
        })
        .collect();

    let counts: Vec<f64> = months.iter().map(|m| m.count as f64).collect();
    let growing = match (months.first(), months.last()) {
        (Some(first), Some(last)) if months.len() >= 2 => last.count > first.count,
        _ => false,
    };

    MonthlyTrend {
        slope: stats::linear_slope(&counts),
        growing,
        months,
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn decimal_mean(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    let (sum, count) = values
        .into_iter()
        .fold((Decimal::ZERO, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / Decimal::from(count))
}

fn percentage(part: Decimal, whole: Decimal) -> Option<Decimal> {
    (whole > Decimal::ZERO).then(|| part / whole * Decimal::ONE_HUNDRED)
}

fn to_floats(
    values: impl Iterator<Item = Decimal>,
    field: &str,
) -> Result<Vec<f64>, AnalyticsError> {
    values
        .map(|v| v.to_f64().ok_or_else(|| AnalyticsError::Conversion(field.to_string())))
        .collect()
}
