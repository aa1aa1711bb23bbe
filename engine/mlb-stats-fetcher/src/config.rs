use league_core::HttpSettings;
use serde::{Deserialize, Serialize};

/// Configuration for the statistics provider client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsApiConfig {
    /// API base URL without a trailing slash
    pub base_url: String,

    /// Sport id (1 = MLB)
    pub sport_id: u32,

    /// Page size for the bulk per-date stat feed
    pub page_limit: u32,

    /// Feed strategies, tried in order
    pub feeds: Vec<String>,

    pub http: HttpSettings,
}

impl Default for StatsApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://statsapi.mlb.com".to_string(),
            sport_id: 1,
            page_limit: 5000,
            feeds: vec!["bulk-stats".to_string(), "boxscores".to_string()],
            http: HttpSettings::default(),
        }
    }
}

impl StatsApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from environment variables that are set
    pub fn apply_env(&mut self) {
        if let Ok(base_url) = std::env::var("MLB_STATS_BASE_URL") {
            self.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Some(sport_id) = std::env::var("MLB_STATS_SPORT_ID").ok().and_then(|v| v.parse().ok()) {
            self.sport_id = sport_id;
        }

        if let Some(timeout) = std::env::var("MLB_STATS_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()) {
            self.http.timeout_secs = timeout;
        }
    }
}
