use chrono::NaiveDate;
use futures::future::join_all;
use league_core::{
    lineup, PlatformPlayerId, PlayerCandidate, PlayerStatus, RosterEntry, StatTotals, StatsPlayerId,
    TeamId, WeekId, WeeklyTeamStat,
};
use player_resolver::PlayerMatch;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use weekly_engine::WeeklyEngine;

use crate::config::ProjectionConfig;
use crate::error::ProjectionError;
use crate::line::ProjectedLine;

/// Up to `lookback` weeks immediately before `target`, oldest first, never below week 1
pub fn prior_weeks(target: WeekId, lookback: u32) -> Vec<WeekId> {
    let first = target.saturating_sub(lookback).max(1);
    (first..target).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamProjection {
    pub team_id: TeamId,
    pub target_week: WeekId,
    /// Prior weeks that returned data
    pub weeks_used: Vec<WeekId>,
    pub line: ProjectedLine,
    pub warnings: Vec<String>,
}

/// The player to project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerQuery {
    /// Fantasy platform id, when known (enables manual overrides)
    #[serde(default)]
    pub platform_id: Option<PlatformPlayerId>,
    pub name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub position: String,
}

impl PlayerQuery {
    fn as_roster_entry(&self) -> RosterEntry {
        RosterEntry {
            player_id: self.platform_id.unwrap_or_default(),
            name: self.name.clone(),
            pro_team: self.team.clone(),
            position: self.position.clone(),
            lineup_slot_id: lineup::UTILITY_SLOT,
            status: PlayerStatus::Active,
            eligible_slots: Vec::new(),
        }
    }
}

/// How the player was tied to a statistics provider id
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Resolution {
    SameDay { confidence: f64, reason: String },
    NameSearch { confidence: f64, reason: String },
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProjection {
    pub query: PlayerQuery,
    pub target_week: WeekId,
    pub player_id: Option<StatsPlayerId>,
    pub player_name: Option<String>,
    pub resolution: Resolution,
    pub weeks_used: Vec<WeekId>,
    pub games_observed: u32,
    /// Factor applied to counting stats (games per week / games observed)
    pub scale: f64,
    pub line: ProjectedLine,
    pub warnings: Vec<String>,
}

/// Historical Projection Engine
pub struct ProjectionEngine {
    weekly: Arc<WeeklyEngine>,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(weekly: Arc<WeeklyEngine>, config: ProjectionConfig) -> Self {
        Self { weekly, config }
    }

    /// Median of each statistic across the prior weeks that produced matches
    pub async fn project_team(&self, team_id: TeamId, target_week: WeekId) -> TeamProjection {
        let weeks = prior_weeks(target_week, self.config.lookback_weeks);
        let results = join_all(weeks.iter().map(|w| self.weekly.aggregate_week(team_id, *w))).await;

        let mut usable: Vec<Arc<WeeklyTeamStat>> = Vec::new();
        let mut warnings = Vec::new();
        for (week, result) in weeks.iter().zip(results) {
            match result {
                Ok(stat) if stat.matched_entries > 0 => usable.push(stat),
                Ok(_) => warnings.push(format!("week {week}: no matched players")),
                Err(e) => {
                    warn!("Week {} left out of team {} projection: {}", week, team_id, e);
                    warnings.push(format!("week {week}: {e}"));
                }
            }
        }

        let refs: Vec<&WeeklyTeamStat> = usable.iter().map(|s| s.as_ref()).collect();
        let line = ProjectedLine::median_of(&refs);
        let weeks_used: Vec<WeekId> = usable.iter().map(|s| s.week_id).collect();

        info!("Projected team {} for week {} from {} prior weeks", team_id, target_week, weeks_used.len());
        TeamProjection { team_id, target_week, weeks_used, line, warnings }
    }

    /// Sum one player's prior-week records, re-derive rates and scale counts to a full week
    pub async fn project_player(
        &self,
        query: PlayerQuery,
        target_week: WeekId,
    ) -> Result<PlayerProjection, ProjectionError> {
        if query.name.trim().is_empty() {
            return Err(ProjectionError::EmptyPlayerName);
        }

        let calendar = self.weekly.calendar();
        let target = calendar
            .week(target_week)
            .await
            .map_err(|source| ProjectionError::CalendarUnavailable { week_id: target_week, source })?;

        let mut warnings = Vec::new();
        let (resolved, resolution) = self.resolve(&query, target.first_day().map(|d| d.date), &mut warnings).await;

        let Some(candidate) = resolved else {
            info!("No statistics provider match for '{}'; projecting zeros", query.name);
            return Ok(PlayerProjection {
                query,
                target_week,
                player_id: None,
                player_name: None,
                resolution,
                weeks_used: Vec::new(),
                games_observed: 0,
                scale: 0.0,
                line: ProjectedLine::default(),
                warnings,
            });
        };

        let weeks = prior_weeks(target_week, self.config.lookback_weeks);
        let calendars = join_all(weeks.iter().map(|w| calendar.week(*w))).await;

        let mut weeks_used = Vec::new();
        let mut dates: Vec<NaiveDate> = Vec::new();
        for (week, result) in weeks.iter().zip(calendars) {
            match result {
                Ok(league_week) => {
                    weeks_used.push(*week);
                    dates.extend(league_week.dates());
                }
                Err(e) => warnings.push(format!("week {week}: calendar unavailable ({e})")),
            }
        }

        let stats = self.weekly.stats_source();
        let days = join_all(dates.iter().map(|date| stats.daily_stats(*date))).await;

        let mut totals = StatTotals::default();
        for (date, day) in dates.iter().zip(days) {
            match day {
                Ok(map) => {
                    if let Some(record) = map.get(&candidate.player_id) {
                        totals += record.totals;
                    }
                }
                Err(e) => warnings.push(format!("{date}: stats unavailable ({e})")),
            }
        }

        let scale = if totals.games > 0 { self.config.games_per_week / totals.games as f64 } else { 0.0 };
        let line = ProjectedLine::from_totals(&totals, scale);

        info!(
            "Projected {} ({}) for week {}: {} games observed, scale {:.2}",
            candidate.name, candidate.player_id, target_week, totals.games, scale
        );

        Ok(PlayerProjection {
            query,
            target_week,
            player_id: Some(candidate.player_id),
            player_name: Some(candidate.name),
            resolution,
            weeks_used,
            games_observed: totals.games,
            scale,
            line,
            warnings,
        })
    }

    /// Same-day candidates from the target week's first day, then a name search
    async fn resolve(
        &self,
        query: &PlayerQuery,
        first_day: Option<NaiveDate>,
        warnings: &mut Vec<String>,
    ) -> (Option<PlayerCandidate>, Resolution) {
        let resolver = self.weekly.resolver();
        let stats = self.weekly.stats_source();
        let entry = query.as_roster_entry();

        if let Some(date) = first_day {
            match stats.daily_stats(date).await {
                Ok(map) => {
                    let candidates: Vec<_> = map.values().map(|s| s.candidate()).collect();
                    let found = resolver.resolve_one(&entry, &candidates);
                    if let Some((candidate, confidence, reason)) = accept_match(found, warnings) {
                        return (Some(candidate), Resolution::SameDay { confidence, reason });
                    }
                }
                Err(e) => warnings.push(format!("{date}: stats unavailable for matching ({e})")),
            }
        }

        match stats.search_players(&query.name).await {
            Ok(people) => {
                let found = resolver.resolve_one(&entry, &people);
                match accept_match(found, warnings) {
                    Some((candidate, confidence, reason)) => {
                        (Some(candidate), Resolution::NameSearch { confidence, reason })
                    }
                    None => (None, Resolution::Unresolved),
                }
            }
            Err(e) => {
                warnings.push(format!("name search failed ({e})"));
                (None, Resolution::Unresolved)
            }
        }
    }
}

/// Keep a match only when it is safe to show, flagging ones too weak for weekly totals
fn accept_match(found: PlayerMatch, warnings: &mut Vec<String>) -> Option<(PlayerCandidate, f64, String)> {
    if !found.is_display_safe() {
        return None;
    }
    let weekly_safe = found.is_weekly_safe();
    let PlayerMatch { entry, candidate, confidence, reason, warnings: notes } = found;
    let candidate = candidate?;
    if !weekly_safe {
        warnings.push(format!(
            "low-confidence match {} -> {} (confidence {:.2})",
            entry.name, candidate.name, confidence
        ));
    }
    warnings.extend(notes);
    Some((candidate, confidence, reason))
}
