use crate::stats::{DistanceMatrix, SummaryStats};
use core_types::{BikeType, UserType};
use rust_decimal::Decimal;
use serde::Serialize;

/// A key together with the number of records that carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry<K = String> {
    pub key: K,
    pub count: usize,
}

/// A per-group aggregate, e.g. the average distance of one user type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupValue<K> {
    pub key: K,
    pub value: Decimal,
}

/// One row of `top_stations.csv`: a station among the most popular start or end
/// stations, with both counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationActivity {
    pub station_id: String,
    pub start_trip_count: usize,
    pub end_trip_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyTrend {
    /// Trip counts per `YYYY-MM`, with months without trips included as zero.
    pub months: Vec<CountEntry>,
    /// Least-squares slope of the monthly counts; `None` for fewer than two months.
    pub slope: Option<f64>,
    /// Whether the last month has more trips than the first.
    pub growing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompletionRate {
    pub completed: usize,
    pub cancelled: usize,
    /// `completed / (completed + cancelled)` in percent; `None` without either status.
    pub rate_pct: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierTrip {
    pub trip_id: String,
    pub duration_minutes: Decimal,
    pub distance_km: Decimal,
    pub duration_z: f64,
    pub distance_z: f64,
    pub max_abs_z: f64,
}

/// One row of `maintenance_summary.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaintenanceSummary {
    pub bike_type: BikeType,
    pub total_cost: Decimal,
    pub records: usize,
    pub unique_bikes: usize,
    pub avg_cost: Decimal,
}

/// The complete analytics report of one run.
///
/// Rankings are already truncated to the sizes configured in `ReportSettings`.
/// A report over zero trips has every trip-derived field zeroed or empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsReport {
    // I. Core KPIs
    pub total_trips: usize,
    pub total_distance_km: Decimal,
    pub average_duration_minutes: Option<Decimal>,

    // II. Station popularity
    pub top_start_stations: Vec<CountEntry>,
    pub top_end_stations: Vec<CountEntry>,
    pub top_stations: Vec<StationActivity>,

    // III. Temporal demand
    pub trips_by_hour: Vec<CountEntry<u32>>,
    pub peak_hour: Option<u32>,
    /// Monday to Sunday, always seven entries once there is at least one trip.
    pub trips_by_weekday: Vec<CountEntry>,
    pub busiest_weekday: Option<CountEntry>,
    pub monthly_trend: MonthlyTrend,

    // IV. Customers
    pub average_distance_by_user_type: Vec<GroupValue<UserType>>,
    pub average_trips_per_user: Vec<GroupValue<UserType>>,
    pub top_users: Vec<CountEntry>,
    pub top_routes: Vec<CountEntry>,
    pub completion: CompletionRate,

    // V. Fleet and maintenance
    pub bike_utilization_pct: Option<Decimal>,
    pub maintenance_cost_by_bike_type: Vec<GroupValue<BikeType>>,
    pub maintenance_frequency: Vec<CountEntry>,
    pub maintenance_summary: Vec<MaintenanceSummary>,

    // VI. Data quality and numerics
    /// Number of outliers before truncation to `max_outliers`.
    pub outlier_count: usize,
    pub outliers: Vec<OutlierTrip>,
    pub duration_stats: Option<SummaryStats>,
    pub distance_stats: Option<SummaryStats>,
    pub station_distances: DistanceMatrix,
}

impl AnalyticsReport {
    /// Creates a new, zeroed-out report.
    pub fn new() -> Self {
        Self::default()
    }
}
