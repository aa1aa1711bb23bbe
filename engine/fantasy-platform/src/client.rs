use async_trait::async_trait;
use league_core::{JsonClient, LeagueDay, ProviderError, RosterEntry, RosterProvider, TeamId};
use request_cache::{fingerprint, CacheConfig, CacheStats, RequestCache};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::PlatformConfig;
use crate::models::{LeagueRosterResponse, PlatformTeam};

const SOURCE_NAME: &str = "fantasy-platform";

/// Roster entries for one team out of a league roster view
pub fn team_roster(teams: &[PlatformTeam], team_id: TeamId) -> Result<Vec<RosterEntry>, ProviderError> {
    let team = teams
        .iter()
        .find(|t| t.id == team_id)
        .ok_or_else(|| ProviderError::NotFound(format!("team {team_id} is not in the league")))?;

    let entries: Vec<RosterEntry> = team
        .roster
        .as_ref()
        .map(|r| r.entries.iter().cloned().map(|e| e.into_roster_entry()).collect())
        .unwrap_or_default();
    Ok(entries)
}

/// Daily roster provider over the fantasy platform's league API
///
/// One league view serves every team, so the view is memoized per scoring
/// period and concurrent team lookups share a single request.
pub struct PlatformRosterClient {
    config: PlatformConfig,
    http: JsonClient,
    views: RequestCache<Arc<Vec<PlatformTeam>>, ProviderError>,
}

impl PlatformRosterClient {
    pub fn new(config: PlatformConfig, cache: CacheConfig) -> Result<Self, ProviderError> {
        let http = JsonClient::new(SOURCE_NAME, &config.http)?;
        Ok(Self { config, http, views: RequestCache::new(cache) })
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.views.stats()
    }

    pub fn clear(&self) {
        self.views.clear();
    }

    /// Drop league views past their TTL
    pub fn purge_expired(&self) -> usize {
        self.views.purge_expired()
    }

    async fn league_view(&self, scoring_period_id: u32) -> Result<Arc<Vec<PlatformTeam>>, ProviderError> {
        let url = self.config.roster_url(scoring_period_id);
        let cookie = self.config.cookie_header.clone();
        let http = self.http.clone();
        let key = fingerprint("league_roster", [self.config.league_id as i64, scoring_period_id as i64]);

        self.views
            .fetch_or_compute(key, move || async move {
                let headers: Vec<(&str, &str)> = match cookie.as_deref() {
                    Some(value) => vec![("Cookie", value)],
                    None => Vec::new(),
                };
                let response: LeagueRosterResponse = http.get_json_with_headers(&url, &headers).await?;
                info!("Loaded roster view for scoring period {} ({} teams)", scoring_period_id, response.teams.len());
                Ok(Arc::new(response.teams))
            })
            .await
    }
}

#[async_trait]
impl RosterProvider for PlatformRosterClient {
    async fn daily_roster(&self, team_id: TeamId, day: &LeagueDay) -> Result<Vec<RosterEntry>, ProviderError> {
        let teams = self.league_view(day.scoring_period_id).await?;
        let entries = team_roster(&teams, team_id)?;
        debug!("Team {} has {} roster entries on {}", team_id, entries.len(), day.date);
        Ok(entries)
    }
}
