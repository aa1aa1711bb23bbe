//! League Tracker Service Library
//!
//! Configuration loading, logging setup and the wiring of every tracker
//! component behind the `league-tracker` command line.

use anyhow::{Context, Result};
use std::path::Path;

pub mod cli;
pub mod config;
pub mod logging;
pub mod service;

pub use cli::{Cli, CliHandler, Commands};
pub use config::TrackerConfig;
pub use logging::initialize_logging;
pub use service::{CacheReport, TeamWeekReport, TrackerService};

/// Load configuration from an optional file and environment variables
pub fn load_configuration(path: Option<&Path>) -> Result<TrackerConfig> {
    config::load_config(path).context("Failed to load tracker configuration")
}
