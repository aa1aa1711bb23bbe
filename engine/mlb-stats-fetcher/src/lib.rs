//! MLB Stats Fetcher
//!
//! Talks to the MLB Stats API and reduces a date's games into one
//! `DailyPlayerStat` per player. Two feeds produce the same appearance
//! shape: the bulk per-date stat groups and, as a fallback, the date's
//! schedule plus every game's box score.

pub mod aggregator;
pub mod client;
pub mod config;
pub mod feeds;
pub mod models;

pub use aggregator::{accumulate, is_final, DailyStatAggregator};
pub use client::{MlbStatsClient, StatsApi};
pub use config::StatsApiConfig;
pub use feeds::{feeds_from_names, BoxscoreFeed, BulkStatsFeed, DailyFeed, PlayerAppearance};
