use async_trait::async_trait;
use chrono::NaiveDate;
use league_core::{JsonClient, PlayerCandidate, ProviderError};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::config::StatsApiConfig;
use crate::models::{
    team_abbreviation, BattingStats, BoxscoreResponse, PeopleResponse, PitchingStats,
    ScheduleResponse, ScheduledGame, Split, StatsResponse,
};

const SOURCE_NAME: &str = "mlb-stats-api";

/// Stat groups of the bulk per-date feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatGroupKind {
    Hitting,
    Pitching,
}

impl StatGroupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatGroupKind::Hitting => "hitting",
            StatGroupKind::Pitching => "pitching",
        }
    }
}

/// Raw statistics provider endpoints
#[async_trait]
pub trait StatsApi: Send + Sync {
    async fn hitting_by_date(&self, date: NaiveDate) -> Result<Vec<Split<BattingStats>>, ProviderError>;

    async fn pitching_by_date(&self, date: NaiveDate) -> Result<Vec<Split<PitchingStats>>, ProviderError>;

    async fn schedule(&self, date: NaiveDate) -> Result<Vec<ScheduledGame>, ProviderError>;

    async fn boxscore(&self, game_pk: u64) -> Result<BoxscoreResponse, ProviderError>;

    async fn search_people(&self, name: &str) -> Result<Vec<PlayerCandidate>, ProviderError>;
}

/// HTTP client for the MLB Stats API
#[derive(Debug, Clone)]
pub struct MlbStatsClient {
    config: StatsApiConfig,
    http: JsonClient,
}

impl MlbStatsClient {
    /// Create a new client instance
    pub fn new(config: StatsApiConfig) -> Result<Self, ProviderError> {
        let http = JsonClient::new(SOURCE_NAME, &config.http)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &StatsApiConfig {
        &self.config
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<String, ProviderError> {
        let base = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        Url::parse_with_params(&base, params)
            .map(String::from)
            .map_err(|e| ProviderError::Unavailable(format!("Invalid stats API URL {base}: {e}")))
    }

    async fn stat_group<S: DeserializeOwned>(
        &self,
        group: StatGroupKind,
        date: NaiveDate,
    ) -> Result<Vec<Split<S>>, ProviderError> {
        let day = date.format("%Y-%m-%d").to_string();
        let url = self.url(
            "/api/v1/stats",
            &[
                ("stats", "byDateRange".to_string()),
                ("group", group.as_str().to_string()),
                ("startDate", day.clone()),
                ("endDate", day),
                ("sportId", self.config.sport_id.to_string()),
                ("playerPool", "ALL".to_string()),
                ("limit", self.config.page_limit.to_string()),
            ],
        )?;

        let response: StatsResponse<S> = self.http.get_json(&url).await?;
        let splits: Vec<Split<S>> = response.stats.into_iter().flat_map(|g| g.splits).collect();

        info!("Fetched {} {} splits for {}", splits.len(), group.as_str(), date);
        Ok(splits)
    }
}

#[async_trait]
impl StatsApi for MlbStatsClient {
    async fn hitting_by_date(&self, date: NaiveDate) -> Result<Vec<Split<BattingStats>>, ProviderError> {
        self.stat_group(StatGroupKind::Hitting, date).await
    }

    async fn pitching_by_date(&self, date: NaiveDate) -> Result<Vec<Split<PitchingStats>>, ProviderError> {
        self.stat_group(StatGroupKind::Pitching, date).await
    }

    async fn schedule(&self, date: NaiveDate) -> Result<Vec<ScheduledGame>, ProviderError> {
        let url = self.url(
            "/api/v1/schedule",
            &[
                ("sportId", self.config.sport_id.to_string()),
                ("date", date.format("%Y-%m-%d").to_string()),
            ],
        )?;

        let response: ScheduleResponse = self.http.get_json(&url).await?;
        let games: Vec<ScheduledGame> = response.dates.into_iter().flat_map(|d| d.games).collect();

        info!("Schedule for {} lists {} games", date, games.len());
        Ok(games)
    }

    async fn boxscore(&self, game_pk: u64) -> Result<BoxscoreResponse, ProviderError> {
        let url = self.url(&format!("/api/v1/game/{game_pk}/boxscore"), &[])?;
        self.http.get_json(&url).await
    }

    async fn search_people(&self, name: &str) -> Result<Vec<PlayerCandidate>, ProviderError> {
        let url = self.url(
            "/api/v1/people/search",
            &[("names", name.to_string()), ("sportIds", self.config.sport_id.to_string())],
        )?;

        let response: PeopleResponse = self.http.get_json(&url).await?;
        let candidates = response
            .people
            .into_iter()
            .map(|person| PlayerCandidate {
                player_id: person.id,
                name: person.full_name,
                team: team_abbreviation(person.current_team.as_ref()),
                position: person
                    .primary_position
                    .and_then(|p| p.abbreviation)
                    .unwrap_or_default(),
            })
            .collect::<Vec<_>>();

        info!("Name search for '{}' returned {} people", name, candidates.len());
        Ok(candidates)
    }
}
