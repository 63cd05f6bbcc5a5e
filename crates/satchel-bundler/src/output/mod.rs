//! Bundle output handling.

pub mod writer;

pub use writer::write_bundle;
