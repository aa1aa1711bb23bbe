use league_core::{ProviderError, WeekId};
use thiserror::Error;

/// Projection failures
///
/// Missing history is not an error: it yields an all-zero projection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("Calendar unavailable for week {week_id}: {source}")]
    CalendarUnavailable { week_id: WeekId, source: ProviderError },

    #[error("Player name must not be empty")]
    EmptyPlayerName,
}
