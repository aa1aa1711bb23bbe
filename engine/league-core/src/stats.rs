//! Stat lines and rate-stat math
//!
//! Counting components are integers (innings are stored as outs) so that
//! sums are exact and independent of accumulation order. Rate stats are
//! always derived from summed components, never averaged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::AddAssign;

use crate::types::{StatsPlayerId, TeamId, WeekId};

/// Outs in a quality start's minimum six innings
pub const QUALITY_START_MIN_OUTS: u32 = 18;

/// Maximum earned runs allowed in a quality start
pub const QUALITY_START_MAX_EARNED_RUNS: u32 = 3;

/// H / AB, zero when there are no at-bats
pub fn batting_average(hits: u32, at_bats: u32) -> f64 {
    if at_bats == 0 {
        return 0.0;
    }
    hits as f64 / at_bats as f64
}

/// ER * 9 / IP, zero when no outs were recorded
pub fn earned_run_average(earned_runs: u32, outs: u32) -> f64 {
    if outs == 0 {
        return 0.0;
    }
    earned_runs as f64 * 27.0 / outs as f64
}

/// (H + BB) / IP, zero when no outs were recorded
pub fn walks_hits_per_inning(hits_allowed: u32, walks: u32, outs: u32) -> f64 {
    if outs == 0 {
        return 0.0;
    }
    (hits_allowed + walks) as f64 * 3.0 / outs as f64
}

/// Batting counting stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HittingLine {
    pub at_bats: u32,
    pub runs: u32,
    pub hits: u32,
    pub home_runs: u32,
    pub rbi: u32,
    pub stolen_bases: u32,
}

impl HittingLine {
    pub fn is_empty(&self) -> bool {
        *self == HittingLine::default()
    }
}

impl AddAssign for HittingLine {
    fn add_assign(&mut self, other: Self) {
        self.at_bats += other.at_bats;
        self.runs += other.runs;
        self.hits += other.hits;
        self.home_runs += other.home_runs;
        self.rbi += other.rbi;
        self.stolen_bases += other.stolen_bases;
    }
}

/// Pitching counting stats plus rate inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchingLine {
    /// Outs recorded (innings pitched * 3)
    pub outs: u32,
    pub earned_runs: u32,
    pub hits_allowed: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub wins: u32,
    pub saves: u32,
    pub quality_starts: u32,
}

impl PitchingLine {
    /// Innings pitched as a decimal (6.2 in box-score notation is 6.667)
    pub fn innings(&self) -> f64 {
        self.outs as f64 / 3.0
    }

    /// A single appearance of at least six innings with at most three earned runs
    pub fn is_quality_start(&self) -> bool {
        self.outs >= QUALITY_START_MIN_OUTS && self.earned_runs <= QUALITY_START_MAX_EARNED_RUNS
    }

    pub fn is_empty(&self) -> bool {
        *self == PitchingLine::default()
    }
}

impl AddAssign for PitchingLine {
    fn add_assign(&mut self, other: Self) {
        self.outs += other.outs;
        self.earned_runs += other.earned_runs;
        self.hits_allowed += other.hits_allowed;
        self.walks += other.walks;
        self.strikeouts += other.strikeouts;
        self.wins += other.wins;
        self.saves += other.saves;
        self.quality_starts += other.quality_starts;
    }
}

/// Derived rate stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RateLine {
    pub avg: f64,
    pub era: f64,
    pub whip: f64,
}

impl RateLine {
    pub fn derive(hitting: &HittingLine, pitching: &PitchingLine) -> Self {
        Self {
            avg: batting_average(hitting.hits, hitting.at_bats),
            era: earned_run_average(pitching.earned_runs, pitching.outs),
            whip: walks_hits_per_inning(pitching.hits_allowed, pitching.walks, pitching.outs),
        }
    }
}

/// Summed hitting and pitching components over any period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatTotals {
    pub hitting: HittingLine,
    pub pitching: PitchingLine,
    pub games: u32,
}

impl StatTotals {
    pub fn rates(&self) -> RateLine {
        RateLine::derive(&self.hitting, &self.pitching)
    }
}

impl AddAssign for StatTotals {
    fn add_assign(&mut self, other: Self) {
        self.hitting += other.hitting;
        self.pitching += other.pitching;
        self.games += other.games;
    }
}

/// Identity fields of a statistics provider player, used for matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCandidate {
    pub player_id: StatsPlayerId,
    pub name: String,
    pub team: String,
    pub position: String,
}

/// One statistics provider player's totals for one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlayerStat {
    pub player_id: StatsPlayerId,
    pub date: NaiveDate,
    pub name: String,
    pub team: String,
    pub position: String,
    pub totals: StatTotals,
    pub rates: RateLine,
}

impl DailyPlayerStat {
    /// Build a record, deriving rates from the summed components
    pub fn new(
        player_id: StatsPlayerId,
        date: NaiveDate,
        name: String,
        team: String,
        position: String,
        totals: StatTotals,
    ) -> Self {
        let rates = totals.rates();
        Self { player_id, date, name, team, position, totals, rates }
    }

    pub fn candidate(&self) -> PlayerCandidate {
        PlayerCandidate {
            player_id: self.player_id,
            name: self.name.clone(),
            team: self.team.clone(),
            position: self.position.clone(),
        }
    }
}

/// A day's records keyed by statistics provider player ID
pub type DailyStatMap = BTreeMap<StatsPlayerId, DailyPlayerStat>;

/// One fantasy team's totals for one league week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTeamStat {
    pub team_id: TeamId,
    pub week_id: WeekId,
    pub hitting: HittingLine,
    pub pitching: PitchingLine,
    pub rates: RateLine,

    /// Accepted roster-entry matches across all days of the week
    pub matched_entries: u32,

    /// Days that contributed nothing because their data was unreachable
    pub skipped_days: u32,

    pub warnings: Vec<String>,
}

impl WeeklyTeamStat {
    /// Build from accumulated totals; rates are derived here and only here
    pub fn from_totals(
        team_id: TeamId,
        week_id: WeekId,
        totals: StatTotals,
        matched_entries: u32,
        skipped_days: u32,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            team_id,
            week_id,
            hitting: totals.hitting,
            pitching: totals.pitching,
            rates: totals.rates(),
            matched_entries,
            skipped_days,
            warnings,
        }
    }

    pub fn innings(&self) -> f64 {
        self.pitching.innings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_denominators() {
        assert_eq!(batting_average(3, 0), 0.0);
        assert_eq!(earned_run_average(4, 0), 0.0);
        assert_eq!(walks_hits_per_inning(2, 1, 0), 0.0);

        let rates = StatTotals::default().rates();
        assert!(rates.avg.is_finite() && rates.era.is_finite() && rates.whip.is_finite());
    }

    #[test]
    fn test_era_recombines_from_components() {
        // 9 IP at 1.00 plus 1 IP at 9.00 is 2 ER in 10 IP
        let mut totals = StatTotals::default();
        totals.pitching += PitchingLine { outs: 27, earned_runs: 1, ..Default::default() };
        totals.pitching += PitchingLine { outs: 3, earned_runs: 1, ..Default::default() };

        assert!((totals.rates().era - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_whip_and_average() {
        let pitching = PitchingLine { outs: 18, hits_allowed: 5, walks: 1, ..Default::default() };
        assert!((walks_hits_per_inning(pitching.hits_allowed, pitching.walks, pitching.outs) - 1.0).abs() < 1e-9);
        assert!((batting_average(2, 5) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_quality_start_boundary() {
        let qs = PitchingLine { outs: 18, earned_runs: 3, ..Default::default() };
        assert!(qs.is_quality_start());

        let short = PitchingLine { outs: 17, earned_runs: 0, ..Default::default() };
        assert!(!short.is_quality_start());

        let shelled = PitchingLine { outs: 21, earned_runs: 4, ..Default::default() };
        assert!(!shelled.is_quality_start());
    }

    #[test]
    fn test_weekly_rates_derived_from_totals() {
        let totals = StatTotals {
            hitting: HittingLine { at_bats: 10, hits: 3, ..Default::default() },
            pitching: PitchingLine { outs: 27, earned_runs: 3, hits_allowed: 6, walks: 3, ..Default::default() },
            games: 2,
        };
        let weekly = WeeklyTeamStat::from_totals(1, 5, totals, 4, 0, Vec::new());

        assert!((weekly.rates.avg - 0.3).abs() < 1e-9);
        assert!((weekly.rates.era - 3.0).abs() < 1e-9);
        assert!((weekly.rates.whip - 1.0).abs() < 1e-9);
        assert!((weekly.innings() - 9.0).abs() < 1e-9);
    }
}
