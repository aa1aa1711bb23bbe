use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::lineup;

/// Fantasy platform player identifier
pub type PlatformPlayerId = i64;

/// Statistics provider player identifier
pub type StatsPlayerId = u64;

/// Fantasy team identifier within a league
pub type TeamId = u32;

/// League week (matchup period) number, 1-based
pub type WeekId = u32;

/// Availability status reported by the fantasy platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlayerStatus {
    #[default]
    Active,
    DayToDay,
    InjuredList,
    Suspended,
    Unknown,
}

impl PlayerStatus {
    /// Map the platform's injury status string
    pub fn from_platform(status: Option<&str>) -> Self {
        match status.map(|s| s.trim().to_ascii_uppercase()) {
            None => PlayerStatus::Active,
            Some(s) => match s.as_str() {
                "" | "ACTIVE" | "NORMAL" => PlayerStatus::Active,
                "DAY_TO_DAY" | "DTD" => PlayerStatus::DayToDay,
                "SUSPENSION" | "SUSPENDED" => PlayerStatus::Suspended,
                s if s.starts_with("SEVEN_DAY")
                    || s.starts_with("TEN_DAY")
                    || s.starts_with("FIFTEEN_DAY")
                    || s.starts_with("SIXTY_DAY")
                    || s == "INJURY_RESERVE"
                    || s == "OUT" =>
                {
                    PlayerStatus::InjuredList
                }
                _ => PlayerStatus::Unknown,
            },
        }
    }
}

/// A player's assignment to a fantasy team for one scoring day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Fantasy platform player ID
    pub player_id: PlatformPlayerId,

    /// Display name (e.g., "Julio Rodríguez")
    pub name: String,

    /// Pro team code as the platform reports it (e.g., "SEA")
    pub pro_team: String,

    /// Default position code (e.g., "OF", "SP")
    pub position: String,

    /// Lineup slot the player occupies on this day
    pub lineup_slot_id: u32,

    /// Availability status
    pub status: PlayerStatus,

    /// Slots the player may be placed in
    pub eligible_slots: Vec<u32>,
}

impl RosterEntry {
    /// Whether this entry sits in a starting slot (not bench or injured list)
    pub fn is_starting(&self) -> bool {
        lineup::is_starting_slot(self.lineup_slot_id)
    }
}

/// One scoring day of a league week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeagueDay {
    /// Calendar date the games are played on
    pub date: NaiveDate,

    /// Platform day identifier (scoring period)
    pub scoring_period_id: u32,
}

/// Ordered days of a league week as supplied by the calendar provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueWeek {
    pub week_id: WeekId,
    pub days: Vec<LeagueDay>,
}

impl LeagueWeek {
    pub fn first_day(&self) -> Option<&LeagueDay> {
        self.days.first()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().map(|day| day.date)
    }
}
