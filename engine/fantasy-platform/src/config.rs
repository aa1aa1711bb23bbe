use league_core::HttpSettings;
use serde::{Deserialize, Serialize};

/// Fantasy platform (ESPN fantasy baseball) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub api_base_url: String,
    pub league_id: u64,
    pub season: i32,

    /// Pre-built `Cookie` header for private leagues, supplied from outside
    pub cookie_header: Option<String>,

    pub http: HttpSettings,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://lm-api-reads.fantasy.espn.com".to_string(),
            league_id: 0,
            season: 2025,
            cookie_header: None,
            http: HttpSettings::default(),
        }
    }
}

impl PlatformConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from environment variables that are set
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("FANTASY_API_BASE_URL") {
            self.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(league_id) = std::env::var("FANTASY_LEAGUE_ID").ok().and_then(|v| v.parse().ok()) {
            self.league_id = league_id;
        }

        if let Some(season) = std::env::var("FANTASY_SEASON").ok().and_then(|v| v.parse().ok()) {
            self.season = season;
        }

        if let Some(cookie) = std::env::var("FANTASY_COOKIE_HEADER").ok().filter(|v| !v.is_empty()) {
            self.cookie_header = Some(cookie);
        }
    }

    /// League roster view for one scoring period
    pub fn roster_url(&self, scoring_period_id: u32) -> String {
        format!(
            "{}/apis/v3/games/flb/seasons/{}/segments/0/leagues/{}?view=mRoster&scoringPeriodId={}",
            self.api_base_url.trim_end_matches('/'),
            self.season,
            self.league_id,
            scoring_period_id
        )
    }
}
