//! League Core - shared records and seams for the league tracker
//!
//! Every upstream payload (fantasy platform rosters, statistics provider
//! feeds) is normalized into the strict types defined here before any
//! matching or aggregation logic sees it.

pub mod calendar;
pub mod error;
pub mod http;
pub mod lineup;
pub mod providers;
pub mod stats;
pub mod types;

pub use calendar::StaticCalendar;
pub use error::ProviderError;
pub use http::{HttpSettings, JsonClient};
pub use providers::{CalendarProvider, DailyStatSource, RosterProvider};
pub use stats::{
    batting_average, earned_run_average, walks_hits_per_inning, DailyPlayerStat, DailyStatMap,
    HittingLine, PitchingLine, PlayerCandidate, RateLine, StatTotals, WeeklyTeamStat,
};
pub use types::{
    LeagueDay, LeagueWeek, PlatformPlayerId, PlayerStatus, RosterEntry, StatsPlayerId, TeamId,
    WeekId,
};
