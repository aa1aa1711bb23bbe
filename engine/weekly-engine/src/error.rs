use league_core::{ProviderError, TeamId, WeekId};
use thiserror::Error;

/// Failures of a whole weekly aggregation
///
/// Per-day and per-player problems never surface here; they become warnings
/// on the result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeeklyError {
    #[error("Calendar unavailable for week {week_id}: {source}")]
    CalendarUnavailable { week_id: WeekId, source: ProviderError },

    #[error("No usable data for team {team_id} in week {week_id}")]
    NoUsableData { team_id: TeamId, week_id: WeekId },
}
