//! Logging setup shared by the schemagen binary and integration tests.

use crate::Result;

/// Maps CLI verbosity flags to a tracing level.
///
/// `quiet` wins over any verbosity: only errors are shown.
pub fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

/// Initializes structured logging based on verbosity level.
///
/// # Arguments
/// * `verbose` - Verbosity level (0=INFO, 1=DEBUG, 2+=TRACE)
/// * `quiet` - If true, only show ERROR level logs
///
/// # Example
/// ```rust,no_run
/// use schemagen_core::logging::init_logging;
///
/// init_logging(1, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level_for(verbose, quiet))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| {
            crate::error::SchemaGenError::configuration(format!(
                "Failed to initialize logging: {}",
                e
            ))
        })?;

    Ok(())
}
