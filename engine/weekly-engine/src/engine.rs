use chrono::NaiveDate;
use futures::future::join_all;
use league_core::{
    CalendarProvider, DailyStatMap, DailyStatSource, LeagueDay, PlayerCandidate, PlayerStatus,
    RosterEntry, RosterProvider, StatTotals, TeamId, WeekId, WeeklyTeamStat,
};
use player_resolver::{PlayerMatch, PlayerResolver};
use request_cache::{fingerprint, CacheConfig, CacheStats, RequestCache};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::WeeklyConfig;
use crate::error::WeeklyError;

/// What one day contributed to a team's week
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    Collected(DayTally),
    /// Roster or stats for the day could not be fetched
    Skipped { date: NaiveDate, warning: String },
}

/// Accepted totals and notes from one day
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayTally {
    pub totals: StatTotals,
    pub matched: u32,
    pub warnings: Vec<String>,
}

/// Fold resolver output for one day into a tally
pub fn tally_day(
    date: NaiveDate,
    matches: &[PlayerMatch],
    stats: &DailyStatMap,
    config: &WeeklyConfig,
) -> DayTally {
    let mut tally = DayTally::default();

    for m in matches {
        let Some(record) = m.stats_player_id().and_then(|id| stats.get(&id)) else {
            if config.warn_unmatched {
                tally.warnings.push(format!("{date}: no stat record for {}", m.entry.name));
            }
            continue;
        };

        if m.confidence < config.acceptance_floor {
            tally.warnings.push(format!(
                "{date}: rejected match {} -> {} (confidence {:.2})",
                m.entry.name, record.name, m.confidence
            ));
            continue;
        }

        if m.confidence < config.low_confidence_threshold {
            warn!("Low-confidence match {} -> {} ({:.2})", m.entry.name, record.name, m.confidence);
            tally.warnings.push(format!(
                "{date}: low-confidence match {} -> {} (confidence {:.2})",
                m.entry.name, record.name, m.confidence
            ));
        }
        for note in &m.warnings {
            tally.warnings.push(format!("{date}: {}: {note}", m.entry.name));
        }

        tally.totals += record.totals;
        tally.matched += 1;
    }

    tally
}

/// Sums day outcomes; rates are derived only in `finish`
#[derive(Debug, Default)]
pub struct WeeklyAccumulator {
    totals: StatTotals,
    matched: u32,
    skipped: u32,
    days: u32,
    warnings: Vec<String>,
}

impl WeeklyAccumulator {
    pub fn add(&mut self, outcome: DayOutcome) {
        self.days += 1;
        match outcome {
            DayOutcome::Collected(tally) => {
                self.totals += tally.totals;
                self.matched += tally.matched;
                self.warnings.extend(tally.warnings);
            }
            DayOutcome::Skipped { warning, .. } => {
                self.skipped += 1;
                self.warnings.push(warning);
            }
        }
    }

    pub fn finish(self, team_id: TeamId, week_id: WeekId) -> Result<WeeklyTeamStat, WeeklyError> {
        if self.days == 0 || self.skipped == self.days {
            return Err(WeeklyError::NoUsableData { team_id, week_id });
        }
        Ok(WeeklyTeamStat::from_totals(team_id, week_id, self.totals, self.matched, self.skipped, self.warnings))
    }
}

struct EngineInner {
    calendar: Arc<dyn CalendarProvider>,
    rosters: Arc<dyn RosterProvider>,
    stats: Arc<dyn DailyStatSource>,
    resolver: Arc<PlayerResolver>,
    config: WeeklyConfig,
}

impl EngineInner {
    async fn compute(&self, team_id: TeamId, week_id: WeekId) -> Result<WeeklyTeamStat, WeeklyError> {
        let week = self
            .calendar
            .week(week_id)
            .await
            .map_err(|source| WeeklyError::CalendarUnavailable { week_id, source })?;

        let outcomes = join_all(week.days.iter().map(|day| self.collect_day(team_id, day))).await;

        let mut accumulator = WeeklyAccumulator::default();
        for outcome in outcomes {
            accumulator.add(outcome);
        }
        let result = accumulator.finish(team_id, week_id)?;

        info!(
            "Team {} week {}: {} matches, {} skipped days, AVG {:.3} ERA {:.2} WHIP {:.2}",
            team_id,
            week_id,
            result.matched_entries,
            result.skipped_days,
            result.rates.avg,
            result.rates.era,
            result.rates.whip
        );
        Ok(result)
    }

    async fn collect_day(&self, team_id: TeamId, day: &LeagueDay) -> DayOutcome {
        let (roster, stats) =
            futures::join!(self.rosters.daily_roster(team_id, day), self.stats.daily_stats(day.date));

        let roster = match roster {
            Ok(roster) => roster,
            Err(e) => return skipped(day.date, "roster", e),
        };
        let stats = match stats {
            Ok(stats) => stats,
            Err(e) => return skipped(day.date, "stats", e),
        };

        let starters: Vec<RosterEntry> = roster.into_iter().filter(|e| e.is_starting()).collect();
        let candidates: Vec<PlayerCandidate> = stats.values().map(|s| s.candidate()).collect();
        let matches = self.resolver.resolve(&starters, &candidates);

        let mut tally = tally_day(day.date, &matches, &stats, &self.config);
        // the slot decides what counts; the status only earns a note
        for entry in &starters {
            let note = match entry.status {
                PlayerStatus::InjuredList => "on the injured list",
                PlayerStatus::Suspended => "suspended",
                _ => continue,
            };
            tally.warnings.push(format!("{}: {} started while {note}", day.date, entry.name));
        }
        debug!("Team {} on {}: {}/{} starters counted", team_id, day.date, tally.matched, starters.len());
        DayOutcome::Collected(tally)
    }
}

fn skipped(date: NaiveDate, what: &str, error: impl std::fmt::Display) -> DayOutcome {
    warn!("Skipping {} for this week: {} unavailable: {}", date, what, error);
    DayOutcome::Skipped { date, warning: format!("{date}: {what} unavailable ({error})") }
}

/// Weekly Stat Aggregation Engine
///
/// Results are memoized per (team, week).
pub struct WeeklyEngine {
    inner: Arc<EngineInner>,
    results: RequestCache<Arc<WeeklyTeamStat>, WeeklyError>,
}

impl WeeklyEngine {
    pub fn new(
        calendar: Arc<dyn CalendarProvider>,
        rosters: Arc<dyn RosterProvider>,
        stats: Arc<dyn DailyStatSource>,
        resolver: Arc<PlayerResolver>,
        config: WeeklyConfig,
        cache: CacheConfig,
    ) -> Self {
        let inner = EngineInner { calendar, rosters, stats, resolver, config };
        Self { inner: Arc::new(inner), results: RequestCache::new(cache) }
    }

    pub fn calendar(&self) -> Arc<dyn CalendarProvider> {
        Arc::clone(&self.inner.calendar)
    }

    pub fn stats_source(&self) -> Arc<dyn DailyStatSource> {
        Arc::clone(&self.inner.stats)
    }

    pub fn resolver(&self) -> Arc<PlayerResolver> {
        Arc::clone(&self.inner.resolver)
    }

    /// One team's totals for one week
    ///
    /// A week with skipped days is returned but not kept, so the next call
    /// retries the days that failed.
    pub async fn aggregate_week(&self, team_id: TeamId, week_id: WeekId) -> Result<Arc<WeeklyTeamStat>, WeeklyError> {
        let key = fingerprint("weekly", [team_id, week_id]);
        let inner = Arc::clone(&self.inner);
        let result = self
            .results
            .fetch_or_compute(key.clone(), move || async move { inner.compute(team_id, week_id).await.map(Arc::new) })
            .await;

        if let Ok(stat) = &result {
            if stat.skipped_days > 0 && self.results.invalidate(&key) {
                debug!("Dropped partial week {} for team {} ({} days skipped)", week_id, team_id, stat.skipped_days);
            }
        }
        result
    }

    /// Every listed team's totals for one week, in input order
    pub async fn aggregate_league(
        &self,
        team_ids: &[TeamId],
        week_id: WeekId,
    ) -> Vec<(TeamId, Result<Arc<WeeklyTeamStat>, WeeklyError>)> {
        let results = join_all(team_ids.iter().map(|team| self.aggregate_week(*team, week_id))).await;
        team_ids.iter().copied().zip(results).collect()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.results.stats()
    }

    /// Forget memoized weeks
    pub fn clear(&self) {
        self.results.clear();
    }

    pub fn purge_expired(&self) -> usize {
        self.results.purge_expired()
    }
}
