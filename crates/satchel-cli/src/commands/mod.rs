//! Command implementations for the Satchel CLI.
//!
//! - [`build`] - bundle an entry module into one script

pub mod build;

pub use build::execute as build_execute;
