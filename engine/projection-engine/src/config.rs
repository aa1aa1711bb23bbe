use serde::{Deserialize, Serialize};

/// Prior weeks considered by default
pub const DEFAULT_LOOKBACK_WEEKS: u32 = 4;

/// Games a full projected week is normalized to
pub const GAMES_PER_WEEK: f64 = 7.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub lookback_weeks: u32,
    pub games_per_week: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self { lookback_weeks: DEFAULT_LOOKBACK_WEEKS, games_per_week: GAMES_PER_WEEK }
    }
}
