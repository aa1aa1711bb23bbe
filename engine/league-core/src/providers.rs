//! Seams to the external collaborators
//!
//! The engines only ever talk to these traits; HTTP implementations live in
//! their own crates and tests plug in in-memory doubles.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::error::ProviderError;
use crate::stats::{DailyStatMap, PlayerCandidate};
use crate::types::{LeagueDay, LeagueWeek, RosterEntry, TeamId, WeekId};

/// Week id -> ordered calendar days
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    async fn week(&self, week_id: WeekId) -> Result<LeagueWeek, ProviderError>;
}

/// (team, day) -> ordered roster entries
#[async_trait]
pub trait RosterProvider: Send + Sync {
    async fn daily_roster(
        &self,
        team_id: TeamId,
        day: &LeagueDay,
    ) -> Result<Vec<RosterEntry>, ProviderError>;
}

/// Per-date statistics reduced to one record per provider player
#[async_trait]
pub trait DailyStatSource: Send + Sync {
    async fn daily_stats(&self, date: NaiveDate) -> Result<Arc<DailyStatMap>, ProviderError>;

    /// Look players up by name when no same-day record exists
    async fn search_players(&self, name: &str) -> Result<Vec<PlayerCandidate>, ProviderError>;
}
