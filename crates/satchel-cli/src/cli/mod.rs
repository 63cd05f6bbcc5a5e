//! Command-line interface definition.
//!
//! - `satchel build` - bundle an entry module and its imports into one script

mod commands;

use clap::Parser;

pub use commands::{BuildArgs, Command};

/// Satchel - bundle ES modules into one self-contained script
#[derive(Parser, Debug)]
#[command(
    name = "satchel",
    version,
    about = "Bundle ES modules into one self-contained script",
    long_about = "Satchel follows the static imports of an entry module, compiles every\n\
                  reachable file, and writes a single script with its own module loader.\n\
                  The output runs in browsers and Node without a native module system."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows each module as it is compiled and each import as it is resolved.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
