use serde::{Deserialize, Serialize};

/// Matches below this confidence are left out of weekly totals
pub const WEEKLY_ACCEPTANCE_FLOOR: f64 = 0.5;

/// Accepted matches below this confidence are reported as warnings
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Weekly aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyConfig {
    pub acceptance_floor: f64,
    pub low_confidence_threshold: f64,

    /// Report starters without a same-day stat record as warnings
    pub warn_unmatched: bool,
}

impl Default for WeeklyConfig {
    fn default() -> Self {
        Self {
            acceptance_floor: WEEKLY_ACCEPTANCE_FLOOR,
            low_confidence_threshold: LOW_CONFIDENCE_THRESHOLD,
            warn_unmatched: true,
        }
    }
}
