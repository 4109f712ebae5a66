//! Library exports for tabling-cli.
//!
//! Exposes the CLI definition so the build script and integration tests can
//! reach it.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod utils;

pub use cli::Cli;
