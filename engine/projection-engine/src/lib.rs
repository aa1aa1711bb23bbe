//! Projection Engine - next-week lines from history
//!
//! Team projections take the per-statistic median of the prior weeks'
//! totals. Player projections sum the player's daily records over the same
//! window, keep AVG/ERA/WHIP from the summed components and scale counting
//! stats to a full week of games.

pub mod config;
pub mod error;
pub mod line;
pub mod projector;


pub use config::{ProjectionConfig, DEFAULT_LOOKBACK_WEEKS, GAMES_PER_WEEK};
pub use error::ProjectionError;
pub use line::{median, ProjectedLine};
pub use projector::{
    prior_weeks, PlayerProjection, PlayerQuery, ProjectionEngine, Resolution, TeamProjection,
};
