use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `citybike.toml`; omitted sections fall back to
/// their `Default` implementation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSettings,
    pub report: ReportSettings,
    pub charts: ChartSettings,
    pub benchmark: BenchmarkSettings,
    pub logging: LoggingSettings,
}

/// Where the raw and cleaned CSV files live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory holding `trips.csv`, `stations.csv` and `maintenance.csv`.
    pub raw_dir: PathBuf,
    /// Directory the `*_cleaned.csv` files are written to and read from.
    pub cleaned_dir: PathBuf,
}

/// Parameters of the analytics report.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Directory the CSV tables and the text summary are exported to.
    pub output_dir: PathBuf,
    pub top_stations: usize,
    pub top_users: usize,
    pub top_routes: usize,
    pub top_maintained_bikes: usize,
    /// Absolute z-score above which a trip counts as an outlier.
    pub outlier_z_threshold: f64,
    pub max_outliers: usize,
}

/// Size and location of the rendered PNG charts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub output_dir: PathBuf,
    /// Pixel width of every chart.
    pub width: u32,
    /// Pixel height of every chart.
    pub height: u32,
    /// Number of equal-width bins of the trip duration histogram.
    pub histogram_bins: usize,
}

/// Parameters of the sort and search benchmarks.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BenchmarkSettings {
    /// Repetitions of each sort; reported timings are per-run averages.
    pub sort_runs: usize,
    /// Repetitions of each search. Searches are fast, so this is much larger.
    pub search_runs: usize,
    /// Station id looked up by the search benchmark.
    pub search_query: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Fallback filter directive used when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs go to a daily rolling file in this directory instead of stderr.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

// --- Default Implementations ---

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data"),
            cleaned_dir: PathBuf::from("data"),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output").join("reports"),
            top_stations: 10,
            top_users: 15,
            top_routes: 10,
            top_maintained_bikes: 15,
            outlier_z_threshold: 3.0,
            max_outliers: 20,
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output").join("figures"),
            width: 1100,
            height: 600,
            histogram_bins: 30,
        }
    }
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        Self {
            sort_runs: 10,
            search_runs: 1000,
            search_query: "ST100".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            directory: None,
        }
    }
}

impl Config {
    /// Rejects settings that would make the benchmark or the report meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.benchmark.sort_runs == 0 || self.benchmark.search_runs == 0 {
            return Err(ConfigError::ValidationError(
                "benchmark run counts must be at least 1".to_string(),
            ));
        }

        let report = &self.report;
        let top_sizes = [
            ("top_stations", report.top_stations),
            ("top_users", report.top_users),
            ("top_routes", report.top_routes),
            ("top_maintained_bikes", report.top_maintained_bikes),
        ];
        if let Some((name, _)) = top_sizes.iter().find(|(_, size)| *size == 0) {
            return Err(ConfigError::ValidationError(format!(
                "report.{name} must be at least 1"
            )));
        }

        if !(report.outlier_z_threshold.is_finite() && report.outlier_z_threshold > 0.0) {
            return Err(ConfigError::ValidationError(
                "report.outlier_z_threshold must be a positive number".to_string(),
            ));
        }

        let charts = &self.charts;
        if charts.width == 0 || charts.height == 0 {
            return Err(ConfigError::ValidationError(
                "charts.width and charts.height must be at least 1 pixel".to_string(),
            ));
        }
        if charts.histogram_bins == 0 {
            return Err(ConfigError::ValidationError(
                "charts.histogram_bins must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
