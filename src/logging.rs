//! Tracing subscriber setup for the binary

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `--quiet` and `--verbose` win over `RUST_LOG`, which wins over the
/// configured level.
pub fn init(config: &LoggingConfig, verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // Ignore a second init (tests, embedding callers)
    let _ = match config.format.as_str() {
        "compact" => builder.compact().try_init(),
        _ => builder.try_init(),
    };
}
