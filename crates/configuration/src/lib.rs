use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    BenchmarkSettings, ChartSettings, Config, DataSettings, LogFormat, LoggingSettings,
    ReportSettings,
};

/// The file looked up by `load_config` in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "citybike.toml";

/// Loads the application configuration from `citybike.toml`.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Loads the application configuration from the given file.
///
/// The file is optional: when it does not exist every section takes its defaults.
/// Environment variables prefixed with `CITYBIKE__` override file values, using
/// `__` between nesting levels (e.g. `CITYBIKE__BENCHMARK__SORT_RUNS=5`).
/// The result is validated before it is returned.
///
/// Nothing is logged here: the caller usually installs the subscriber only once
/// the logging section of the result is known.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("CITYBIKE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}
