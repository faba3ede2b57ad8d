use algorithms::SortOrder;
use analytics::{
    AnalyticsEngine, AnalyticsInput, AnalyticsReport, DataSources, export_report, render_summary,
};
use anyhow::Context;
use benchmark::{BenchmarkCase, run_fleet_suite};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use configuration::{Config, DEFAULT_CONFIG_FILE, LogFormat, load_config_from};
use core_types::Station;
use dataset::CsvRepository;
use fleet::{Fleet, StationField};
use indicatif::ProgressBar;
use std::path::PathBuf;

/// The main entry point for the CityBike command-line application.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    // Held until exit so the file writer can flush.
    let _log_guard =
        configuration::init_tracing(&config.logging).context("Failed to initialise logging")?;
    tracing::debug!(
        path = %cli.config.display(),
        file_found = cli.config.is_file(),
        ?config,
        "configuration loaded"
    );

    match cli.command {
        Commands::Clean { inspect } => handle_clean(&config, inspect),
        Commands::Sort { descending, limit } => handle_sort(&config, descending, limit),
        Commands::Search { query, by } => handle_search(&config, &query, by.into()),
        Commands::Benchmark { json } => handle_benchmark(&config, json),
        Commands::Report => handle_report(&config),
        Commands::Charts => handle_charts(&config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Cleans, explores and benchmarks bike-share trip data.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. A missing file means defaults.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Overrides `logging.format` from the configuration.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the raw CSV exports and write the cleaned tables.
    Clean {
        /// Print raw, kept and dropped row counts per table.
        #[arg(long)]
        inspect: bool,
    },
    /// Sort trips by distance with the merge sort and the standard library.
    Sort {
        #[arg(long)]
        descending: bool,

        /// Number of trips to print from each sorted list.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Look up a station by id or name.
    Search {
        query: String,

        #[arg(long, value_enum, default_value_t = SearchBy::Id)]
        by: SearchBy,
    },
    /// Time the hand-written sort and search against the standard library.
    Benchmark {
        /// Print the results as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Calculate the analytics report and export its tables.
    Report,
    /// Render the report charts as PNG files.
    Charts,
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchBy {
    Id,
    Name,
}

impl From<SearchBy> for StationField {
    fn from(by: SearchBy) -> Self {
        match by {
            SearchBy::Id => StationField::Id,
            SearchBy::Name => StationField::Name,
        }
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_clean(config: &Config, inspect: bool) -> anyhow::Result<()> {
    let repository = CsvRepository::from_settings(&config.data);
    let cleaned = repository.clean().context("Failed to clean the raw tables")?;

    if inspect {
        let mut table = new_table(vec!["Table", "Raw rows", "Kept rows", "Dropped rows"]);
        for summary in &cleaned.summaries {
            table.add_row(vec![
                summary.table.clone(),
                summary.raw_rows.to_string(),
                summary.kept_rows.to_string(),
                summary.dropped_rows().to_string(),
            ]);
        }
        println!("{table}");
    }

    println!(
        "Cleaned tables written to {}",
        config.data.cleaned_dir.display()
    );
    Ok(())
}

fn handle_sort(config: &Config, descending: bool, limit: usize) -> anyhow::Result<()> {
    let fleet = load_fleet(config)?;
    let order = if descending {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };

    let custom = fleet.sort_trips_by_distance(order);
    let reference = fleet.sort_trips_by_distance_reference(order);

    let mut table = new_table(vec!["#", "Merge sort", "Std sort"]);
    for (rank, (a, b)) in custom.iter().zip(&reference).take(limit).enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            format!("{} ({} km)", a.trip_id, a.distance_km),
            format!("{} ({} km)", b.trip_id, b.distance_km),
        ]);
    }
    println!("{table}");
    println!("Identical order: {}", custom == reference);
    println!("Total distance: {:.2} km", fleet.total_distance());
    Ok(())
}

fn handle_search(config: &Config, query: &str, field: StationField) -> anyhow::Result<()> {
    let fleet = load_fleet(config)?;

    let describe = |found: Option<&Station>| match found {
        Some(station) => format!("{} ({})", station.station_id, station.name),
        None => "not found".to_string(),
    };
    println!("Binary search: {}", describe(fleet.search_station(query, field)));
    println!("Linear scan:   {}", describe(fleet.search_station_reference(query, field)));
    Ok(())
}

fn handle_benchmark(config: &Config, json: bool) -> anyhow::Result<()> {
    let fleet = load_fleet(config)?;

    let progress = if json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    let cases = run_fleet_suite(&fleet, &config.benchmark, &progress)
        .context("Failed to run the benchmarks")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cases)?);
    } else {
        println!("{}", benchmark_table(&cases));
        if cases.iter().any(|case| !case.result.optimized_build()) {
            println!(
                "Note: debug build. Binary search re-checks that its input is sorted, \
                 which is linear; run with `--release` for comparable timings."
            );
        }
    }
    Ok(())
}

fn handle_report(config: &Config) -> anyhow::Result<()> {
    let fleet = load_fleet(config)?;
    let report = calculate_report(config, &fleet)?;

    let [trips, stations, maintenance] = CsvRepository::from_settings(&config.data).cleaned_paths();
    let sources = DataSources {
        trips,
        stations,
        maintenance,
    };
    println!("{}", render_summary(&report, &sources));

    let written = export_report(&report, &sources, &config.report.output_dir)
        .context("Failed to export the analytics report")?;
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn handle_charts(config: &Config) -> anyhow::Result<()> {
    let fleet = load_fleet(config)?;
    let report = calculate_report(config, &fleet)?;

    let written = charts::render_charts(&report, fleet.trips(), &config.charts)
        .context("Failed to render the charts")?;
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn calculate_report(config: &Config, fleet: &Fleet) -> anyhow::Result<AnalyticsReport> {
    let input = AnalyticsInput {
        trips: fleet.trips(),
        stations: fleet.stations(),
        maintenance: fleet.maintenance(),
    };
    AnalyticsEngine::new()
        .calculate(&input, &config.report)
        .context("Failed to calculate the analytics report")
}

fn load_fleet(config: &Config) -> anyhow::Result<Fleet> {
    let repository = CsvRepository::from_settings(&config.data);
    Fleet::from_repository(&repository)
        .context("Failed to load the cleaned tables; run `citybike clean` first")
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn benchmark_table(cases: &[BenchmarkCase]) -> Table {
    let mut table = new_table(vec![
        "Case",
        "Records",
        "Runs",
        "Merge/binary (avg)",
        "Std (avg)",
        "Ratio",
        "Outputs equal",
    ]);
    for case in cases {
        let result = &case.result;
        table.add_row(vec![
            case.name.to_string(),
            result.records_processed().to_string(),
            result.runs().to_string(),
            format!("{:?}", result.custom_elapsed()),
            format!("{:?}", result.reference_elapsed()),
            result
                .speed_ratio()
                .map_or_else(|| "n/a".to_string(), |ratio| format!("{ratio:.2}x")),
            result.outputs_equal().to_string(),
        ]);
    }
    table
}
