//! Logger setup for applications embedding the project core.

use log::LevelFilter;

use crate::config::LoggingConfig;

/// Install `env_logger` according to the logging configuration.
///
/// Does nothing when logging is disabled. `RUST_LOG` still refines the
/// configured level. Calling this more than once is harmless.
pub fn init_logging(config: &LoggingConfig) {
    if !config.enabled {
        return;
    }

    let level = parse_level(&config.level);
    let result = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();

    if result.is_err() {
        log::debug!("Logger already initialized, keeping existing one");
    }
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}
