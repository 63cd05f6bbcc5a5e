//! Logging setup for the Satchel CLI.
//!
//! Library crates only emit `tracing` events; this module decides which of
//! them reach the terminal.
//!
//! # Example
//!
//! ```rust,no_run
//! use satchel_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("Starting build");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "satchel_graph=debug,satchel_bundler=debug,satchel_cli=debug";
const QUIET_FILTER: &str = "satchel_graph=error,satchel_bundler=error,satchel_cli=error";
const DEFAULT_FILTER: &str = "satchel_graph=info,satchel_bundler=info,satchel_cli=info";

/// Build the filter for the given verbosity flags.
///
/// The level is chosen in this order:
/// 1. `--verbose`: debug for satchel crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`, when set and valid
/// 4. info for satchel crates
pub fn env_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the global tracing subscriber.
///
/// Call once at program start. Logs go to stderr so stdout stays clean for
/// anything piped out of the CLI.
///
/// # Arguments
///
/// * `verbose` - Enable debug-level logging
/// * `quiet` - Only show error-level logs
/// * `no_color` - Disable ANSI colors
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter(verbose, quiet))
        .with(fmt_layer)
        .init();
}
