//! Projected stat lines
//!
//! Projections are fractional (a median of two weeks, a 7/3 scale factor),
//! so every field is an `f64`.

use league_core::{RateLine, StatTotals, WeeklyTeamStat};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectedLine {
    pub at_bats: f64,
    pub runs: f64,
    pub hits: f64,
    pub home_runs: f64,
    pub rbi: f64,
    pub stolen_bases: f64,

    pub innings: f64,
    pub earned_runs: f64,
    pub hits_allowed: f64,
    pub walks: f64,
    pub strikeouts: f64,
    pub wins: f64,
    pub saves: f64,
    pub quality_starts: f64,

    pub avg: f64,
    pub era: f64,
    pub whip: f64,
}

impl ProjectedLine {
    /// Counting stats multiplied by `scale`; rates come from the unscaled components
    pub fn from_totals(totals: &StatTotals, scale: f64) -> Self {
        let h = &totals.hitting;
        let p = &totals.pitching;
        let rates: RateLine = totals.rates();

        Self {
            at_bats: h.at_bats as f64 * scale,
            runs: h.runs as f64 * scale,
            hits: h.hits as f64 * scale,
            home_runs: h.home_runs as f64 * scale,
            rbi: h.rbi as f64 * scale,
            stolen_bases: h.stolen_bases as f64 * scale,
            innings: p.innings() * scale,
            earned_runs: p.earned_runs as f64 * scale,
            hits_allowed: p.hits_allowed as f64 * scale,
            walks: p.walks as f64 * scale,
            strikeouts: p.strikeouts as f64 * scale,
            wins: p.wins as f64 * scale,
            saves: p.saves as f64 * scale,
            quality_starts: p.quality_starts as f64 * scale,
            avg: rates.avg,
            era: rates.era,
            whip: rates.whip,
        }
    }

    /// Per-statistic median across weeks; all zeros for no weeks
    pub fn median_of(weeks: &[&WeeklyTeamStat]) -> Self {
        Self {
            at_bats: median_by(weeks, |w| w.hitting.at_bats as f64),
            runs: median_by(weeks, |w| w.hitting.runs as f64),
            hits: median_by(weeks, |w| w.hitting.hits as f64),
            home_runs: median_by(weeks, |w| w.hitting.home_runs as f64),
            rbi: median_by(weeks, |w| w.hitting.rbi as f64),
            stolen_bases: median_by(weeks, |w| w.hitting.stolen_bases as f64),
            innings: median_by(weeks, |w| w.pitching.innings()),
            earned_runs: median_by(weeks, |w| w.pitching.earned_runs as f64),
            hits_allowed: median_by(weeks, |w| w.pitching.hits_allowed as f64),
            walks: median_by(weeks, |w| w.pitching.walks as f64),
            strikeouts: median_by(weeks, |w| w.pitching.strikeouts as f64),
            wins: median_by(weeks, |w| w.pitching.wins as f64),
            saves: median_by(weeks, |w| w.pitching.saves as f64),
            quality_starts: median_by(weeks, |w| w.pitching.quality_starts as f64),
            avg: median_by(weeks, |w| w.rates.avg),
            era: median_by(weeks, |w| w.rates.era),
            whip: median_by(weeks, |w| w.rates.whip),
        }
    }
}

fn median_by(weeks: &[&WeeklyTeamStat], field: impl Fn(&WeeklyTeamStat) -> f64) -> f64 {
    median(weeks.iter().map(|w| field(w)).collect())
}

/// Middle value, or the mean of the two middle values; 0 when empty
pub fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
