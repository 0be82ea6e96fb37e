// src/logging.rs
// =============================================================================
// Sets up `tracing` output.
//
// Logs go to stderr so stdout stays clean for the URL / JSON we print.
// RUST_LOG wins when set; otherwise only warnings show, or our own debug
// output with --verbose.
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub fn init_logging(verbose: bool) -> Result<()> {
    let default_filter = if verbose {
        "warn,report_resolver=debug"
    } else {
        "warn"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    tracing::debug!("logging initialized");

    Ok(())
}
