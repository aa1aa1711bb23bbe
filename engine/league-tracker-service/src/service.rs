//! Component wiring for the tracker

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use fantasy_platform::PlatformRosterClient;
use league_core::{DailyStatSource, RosterProvider, StaticCalendar, TeamId, WeekId, WeeklyTeamStat};
use mlb_stats_fetcher::{feeds_from_names, DailyStatAggregator, MlbStatsClient, StatsApi};
use player_resolver::PlayerResolver;
use projection_engine::{PlayerProjection, PlayerQuery, ProjectionEngine, TeamProjection};
use request_cache::{CacheStats, RequestCache};
use weekly_engine::{WeeklyEngine, WeeklyError};

use crate::config::TrackerConfig;

/// One row of a league-wide weekly report
#[derive(Debug, Clone, Serialize)]
pub struct TeamWeekReport {
    pub team_id: TeamId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<WeeklyTeamStat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TeamWeekReport {
    fn from_result(team_id: TeamId, result: Result<Arc<WeeklyTeamStat>, WeeklyError>) -> Self {
        match result {
            Ok(stat) => Self { team_id, totals: Some(stat.as_ref().clone()), error: None },
            Err(e) => Self { team_id, totals: None, error: Some(e.to_string()) },
        }
    }
}

/// Counters of every cache in the process
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    pub daily_stats: CacheStats,
    pub player_search: CacheStats,
    pub rosters: CacheStats,
    pub weekly: CacheStats,
}

/// Every component wired together from one `TrackerConfig`
pub struct TrackerService {
    config: TrackerConfig,
    stats: Arc<DailyStatAggregator>,
    rosters: Arc<PlatformRosterClient>,
    weekly: Arc<WeeklyEngine>,
    projections: ProjectionEngine,
}

impl TrackerService {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        let api: Arc<dyn StatsApi> = Arc::new(
            MlbStatsClient::new(config.stats_api.clone()).context("Failed to build statistics client")?,
        );
        let feeds = feeds_from_names(&config.stats_api.feeds, api.clone()).context("Invalid feed configuration")?;
        let stats = Arc::new(DailyStatAggregator::new(api, feeds, RequestCache::new(config.cache.clone())));

        let rosters = Arc::new(
            PlatformRosterClient::new(config.platform.clone(), config.cache.clone())
                .context("Failed to build fantasy platform client")?,
        );

        let calendar = Arc::new(StaticCalendar::new(config.calendar.weeks.clone()));
        if calendar.is_empty() {
            tracing::warn!("No calendar weeks configured; weekly commands will fail");
        }

        let resolver = Arc::new(PlayerResolver::new(config.resolver.to_resolver_config()));
        let roster_source: Arc<dyn RosterProvider> = rosters.clone();
        let stat_source: Arc<dyn DailyStatSource> = stats.clone();

        let weekly = Arc::new(WeeklyEngine::new(
            calendar,
            roster_source,
            stat_source,
            resolver,
            config.weekly.clone(),
            config.cache.clone(),
        ));
        let projections = ProjectionEngine::new(weekly.clone(), config.projection.clone());

        info!(
            "Tracker ready: league {}, {} calendar weeks, feeds {:?}",
            config.platform.league_id,
            config.calendar.weeks.len(),
            stats.feed_names()
        );

        Ok(Self { config, stats, rosters, weekly, projections })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub async fn week(&self, team_id: TeamId, week_id: WeekId) -> Result<Arc<WeeklyTeamStat>> {
        self.weekly
            .aggregate_week(team_id, week_id)
            .await
            .with_context(|| format!("Failed to aggregate team {} for week {}", team_id, week_id))
    }

    /// Weekly totals for `team_ids`, or every configured team when empty
    pub async fn league(&self, team_ids: &[TeamId], week_id: WeekId) -> Vec<TeamWeekReport> {
        let teams = if team_ids.is_empty() { self.config.service.team_ids.as_slice() } else { team_ids };
        self.weekly
            .aggregate_league(teams, week_id)
            .await
            .into_iter()
            .map(|(team_id, result)| TeamWeekReport::from_result(team_id, result))
            .collect()
    }

    pub async fn project_team(&self, team_id: TeamId, target_week: WeekId) -> TeamProjection {
        self.projections.project_team(team_id, target_week).await
    }

    pub async fn project_player(&self, query: PlayerQuery, target_week: WeekId) -> Result<PlayerProjection> {
        let name = query.name.clone();
        self.projections
            .project_player(query, target_week)
            .await
            .with_context(|| format!("Failed to project '{}' for week {}", name, target_week))
    }

    /// Drop expired entries everywhere, then report the counters
    pub fn cache_report(&self) -> CacheReport {
        let purged = self.stats.purge_expired() + self.rosters.purge_expired() + self.weekly.purge_expired();
        if purged > 0 {
            debug!("Purged {} expired cache entries", purged);
        }

        CacheReport {
            daily_stats: self.stats.cache_stats(),
            player_search: self.stats.search_cache_stats(),
            rosters: self.rosters.cache_stats(),
            weekly: self.weekly.cache_stats(),
        }
    }
}
