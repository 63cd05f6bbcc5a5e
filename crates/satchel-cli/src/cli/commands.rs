use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available Satchel subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bundle an entry module and everything it imports
    ///
    /// Resolves relative and root-absolute imports, compiles each module to
    /// the chosen target, and writes one script to the output path.
    Build(BuildArgs),
}

/// Arguments for the build command
#[derive(Args, Debug, Default, Clone)]
pub struct BuildArgs {
    /// Entry module, relative to the project root
    ///
    /// Falls back to `entry` from satchel.config.json when omitted.
    ///
    /// Examples:
    ///   satchel build src/main.js
    ///   satchel build src/app.ts -o dist/app.js
    #[arg(value_name = "ENTRY")]
    pub entry: Option<String>,

    /// Output file for the bundle
    ///
    /// Relative paths are taken from the project root. Defaults to
    /// `dist/bundle.js`.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Project root; imports may not leave this directory
    ///
    /// Defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// ECMAScript target for compiled modules (e.g. es2015, es2020, esnext)
    #[arg(long, value_name = "TARGET")]
    pub target: Option<String>,

    /// Maximum number of modules in the graph
    #[arg(long, value_name = "N")]
    pub max_modules: Option<usize>,

    /// Path to a config file (default: ./satchel.config.json when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
