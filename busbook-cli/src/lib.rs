//! Library exports for busbook-cli.
//!
//! This module exports the CLI structure so integration tests and
//! documentation tooling can reach it.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod utils;

// Re-export CLI for build script
pub use cli::Cli;
