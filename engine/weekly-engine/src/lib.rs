//! Weekly Engine - team totals for a league week
//!
//! For each day of the week the engine loads the team's roster and the
//! day's stat map, drops bench and injured-list entries, resolves the rest
//! to statistics provider players and sums the accepted lines. AVG, ERA and
//! WHIP are derived once, from the week's summed components.

pub mod config;
pub mod engine;
pub mod error;

pub use config::{WeeklyConfig, LOW_CONFIDENCE_THRESHOLD, WEEKLY_ACCEPTANCE_FLOOR};
pub use engine::{tally_day, DayOutcome, DayTally, WeeklyAccumulator, WeeklyEngine};
pub use error::WeeklyError;
