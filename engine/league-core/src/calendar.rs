//! Calendar provider over a fixed, externally supplied set of weeks

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::error::ProviderError;
use crate::providers::CalendarProvider;
use crate::types::{LeagueWeek, WeekId};

/// Serves league weeks loaded from configuration; never builds dates itself
#[derive(Debug, Clone, Default)]
pub struct StaticCalendar {
    weeks: BTreeMap<WeekId, LeagueWeek>,
}

impl StaticCalendar {
    pub fn new(weeks: impl IntoIterator<Item = LeagueWeek>) -> Self {
        Self { weeks: weeks.into_iter().map(|w| (w.week_id, w)).collect() }
    }

    pub fn week_ids(&self) -> Vec<WeekId> {
        self.weeks.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

#[async_trait]
impl CalendarProvider for StaticCalendar {
    async fn week(&self, week_id: WeekId) -> Result<LeagueWeek, ProviderError> {
        self.weeks
            .get(&week_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("week {week_id} is not in the calendar")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LeagueDay;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_lookup() {
        let day = LeagueDay { date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(), scoring_period_id: 5 };
        let calendar = StaticCalendar::new(vec![LeagueWeek { week_id: 2, days: vec![day] }]);

        assert_eq!(calendar.week_ids(), vec![2]);
        assert_eq!(calendar.week(2).await.unwrap().first_day(), Some(&day));
        assert!(matches!(calendar.week(3).await, Err(ProviderError::NotFound(_))));
    }
}
