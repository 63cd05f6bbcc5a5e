//! Satchel CLI - bundle an ES module graph into one runnable script.
//!
//! This crate is the command-line front end for [`satchel_bundler`]. It owns
//! everything the library crates deliberately leave out: argument parsing,
//! layered configuration, log output and terminal formatting.
//!
//! # Architecture
//!
//! - [`cli`] - clap definitions for `satchel build`
//! - [`config`] - `satchel.config.json` / environment / flag layering
//! - [`commands`] - command implementations
//! - [`error`] - CLI error types with hints, rendered through miette
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status messages and size/duration formatting
//!
//! # Example
//!
//! ```rust,no_run
//! use satchel_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{BuildError, CliError, ConfigError, Result};
