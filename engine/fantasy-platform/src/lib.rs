//! Fantasy Platform - daily roster provider
//!
//! Reads the fantasy platform's league roster view for a scoring period and
//! normalizes each team's entries into `RosterEntry` records.

pub mod client;
pub mod config;
pub mod models;

pub use client::{team_roster, PlatformRosterClient};
pub use config::PlatformConfig;
