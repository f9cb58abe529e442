//! Command-line interface
//!
//! Command handlers and application state for the `poor` binary.

pub mod commands;

pub use commands::*;
