use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use league_core::{
    DailyPlayerStat, DailyStatMap, DailyStatSource, PlayerCandidate, ProviderError, StatTotals,
    StatsPlayerId,
};
use request_cache::{fingerprint, CacheStats, Expiry, RequestCache};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::client::StatsApi;
use crate::feeds::{DailyFeed, PlayerAppearance};

/// Hours after the end of a date before its games are treated as final.
/// Late west-coast games finish around 07:00 UTC the next day.
pub const FINAL_AFTER_HOURS: i64 = 12;

/// Whether every game on `date` has certainly finished at `now`
pub fn is_final(date: NaiveDate, now: DateTime<Utc>) -> bool {
    date < (now - Duration::hours(FINAL_AFTER_HOURS)).date_naive()
}

/// Sum appearances into one record per player; rates are derived after summing
pub fn accumulate(date: NaiveDate, appearances: Vec<PlayerAppearance>) -> DailyStatMap {
    let mut totals: BTreeMap<StatsPlayerId, (PlayerAppearance, StatTotals)> = BTreeMap::new();

    for appearance in appearances {
        let line = StatTotals {
            hitting: appearance.hitting,
            pitching: appearance.pitching,
            games: appearance.games,
        };
        match totals.get_mut(&appearance.player_id) {
            Some((first, sum)) => {
                *sum += line;
                if first.position.is_empty() {
                    first.position = appearance.position;
                }
            }
            None => {
                totals.insert(appearance.player_id, (appearance, line));
            }
        }
    }

    totals
        .into_iter()
        .map(|(player_id, (first, sum))| {
            let record = DailyPlayerStat::new(player_id, date, first.name, first.team, first.position, sum);
            (player_id, record)
        })
        .collect()
}

/// Try each feed in order; an empty result falls through to the next feed.
/// A day is empty only when every feed agreed it was empty.
async fn run_feeds(feeds: &[Arc<dyn DailyFeed>], date: NaiveDate) -> Result<DailyStatMap, ProviderError> {
    let mut last_error = None;
    let mut empty_success = false;

    for feed in feeds {
        match feed.fetch(date).await {
            Ok(appearances) if appearances.is_empty() => {
                debug!("Feed {} returned nothing for {}", feed.name(), date);
                empty_success = true;
            }
            Ok(appearances) => {
                let map = accumulate(date, appearances);
                info!("Aggregated {} players for {} via {}", map.len(), date, feed.name());
                return Ok(map);
            }
            Err(e) => {
                warn!("Feed {} failed for {}: {}", feed.name(), date, e);
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(err) => {
            error!("No daily feed produced stats for {}: {}", date, err);
            Err(err)
        }
        None if empty_success => Ok(DailyStatMap::new()),
        None => Err(ProviderError::Unavailable("no daily feeds configured".to_string())),
    }
}

/// Per-date stat maps over an ordered list of feeds, memoized per date
pub struct DailyStatAggregator {
    api: Arc<dyn StatsApi>,
    feeds: Arc<Vec<Arc<dyn DailyFeed>>>,
    days: RequestCache<Arc<DailyStatMap>, ProviderError>,
    searches: RequestCache<Vec<PlayerCandidate>, ProviderError>,
    clock: fn() -> DateTime<Utc>,
}

impl DailyStatAggregator {
    /// Create an aggregator over `feeds`, storing day maps in `days`
    pub fn new(
        api: Arc<dyn StatsApi>,
        feeds: Vec<Arc<dyn DailyFeed>>,
        days: RequestCache<Arc<DailyStatMap>, ProviderError>,
    ) -> Self {
        let searches = RequestCache::new(days.config().clone());
        Self { api, feeds: Arc::new(feeds), days, searches, clock: Utc::now }
    }

    /// Replace the wall clock used to decide whether a date is final
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn feed_names(&self) -> Vec<String> {
        self.feeds.iter().map(|f| f.name().to_string()).collect()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.days.stats()
    }

    pub fn search_cache_stats(&self) -> CacheStats {
        self.searches.stats()
    }

    /// Drop days and searches past their TTL; final days never expire
    pub fn purge_expired(&self) -> usize {
        self.days.purge_expired() + self.searches.purge_expired()
    }

    /// Drop every memoized day and search
    pub fn clear(&self) {
        self.days.clear();
        self.searches.clear();
    }
}

#[async_trait]
impl DailyStatSource for DailyStatAggregator {
    async fn daily_stats(&self, date: NaiveDate) -> Result<Arc<DailyStatMap>, ProviderError> {
        let expiry = if is_final(date, (self.clock)()) {
            Expiry::Never
        } else {
            Expiry::After(self.days.config().default_ttl())
        };

        let feeds = Arc::clone(&self.feeds);
        self.days
            .fetch_or_compute_with(fingerprint("daily_stats", [date]), expiry, move || async move {
                run_feeds(&feeds, date).await.map(Arc::new)
            })
            .await
    }

    async fn search_players(&self, name: &str) -> Result<Vec<PlayerCandidate>, ProviderError> {
        let query = name.trim().to_string();
        let api = Arc::clone(&self.api);
        let key = fingerprint("player_search", [query.to_lowercase()]);

        self.searches
            .fetch_or_compute(key, move || async move { api.search_people(&query).await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::feeds_from_names;
    use crate::models::{BattingStats, BoxscoreResponse, PitchingStats, ScheduledGame, Split};
    use chrono::TimeZone;
    use request_cache::CacheConfig;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory stats API with per-endpoint failure switches and call counters
    #[derive(Default)]
    struct FakeStatsApi {
        hitting: Vec<serde_json::Value>,
        pitching: Vec<serde_json::Value>,
        bulk_error: Option<ProviderError>,
        games: Vec<u64>,
        boxscores: HashMap<u64, serde_json::Value>,
        boxscore_error: Option<ProviderError>,
        people: Vec<PlayerCandidate>,
        bulk_calls: AtomicUsize,
        boxscore_calls: AtomicUsize,
        search_calls: AtomicUsize,
    }

    #[async_trait]
    impl StatsApi for FakeStatsApi {
        async fn hitting_by_date(&self, _: NaiveDate) -> Result<Vec<Split<BattingStats>>, ProviderError> {
            self.bulk_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(e) = &self.bulk_error {
                return Err(e.clone());
            }
            Ok(self.hitting.iter().map(|v| serde_json::from_value(v.clone()).unwrap()).collect())
        }

        async fn pitching_by_date(&self, _: NaiveDate) -> Result<Vec<Split<PitchingStats>>, ProviderError> {
            if let Some(e) = &self.bulk_error {
                return Err(e.clone());
            }
            Ok(self.pitching.iter().map(|v| serde_json::from_value(v.clone()).unwrap()).collect())
        }

        async fn schedule(&self, _: NaiveDate) -> Result<Vec<ScheduledGame>, ProviderError> {
            Ok(self
                .games
                .iter()
                .map(|pk| {
                    let game = json!({"gamePk": pk, "status": {"abstractGameState": "Final"}});
                    serde_json::from_value(game).unwrap()
                })
                .collect())
        }

        async fn boxscore(&self, game_pk: u64) -> Result<BoxscoreResponse, ProviderError> {
            self.boxscore_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(e) = &self.boxscore_error {
                return Err(e.clone());
            }
            self.boxscores
                .get(&game_pk)
                .map(|v| serde_json::from_value(v.clone()).unwrap())
                .ok_or_else(|| ProviderError::NotFound(format!("game {game_pk}")))
        }

        async fn search_people(&self, _: &str) -> Result<Vec<PlayerCandidate>, ProviderError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.people.clone())
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn aggregator(api: FakeStatsApi) -> (Arc<FakeStatsApi>, DailyStatAggregator) {
        let api = Arc::new(api);
        let dyn_api: Arc<dyn StatsApi> = api.clone();
        let feeds =
            feeds_from_names(&["bulk-stats".to_string(), "boxscores".to_string()], dyn_api.clone()).unwrap();
        let aggregator =
            DailyStatAggregator::new(dyn_api, feeds, RequestCache::new(CacheConfig::default())).with_clock(fixed_now);
        (api, aggregator)
    }

    fn batter_game(game_pk: u64, at_bats: u32, hits: u32) -> serde_json::Value {
        json!({
            "teams": {
                "away": {
                    "team": {"id": 136, "abbreviation": "SEA"},
                    "players": {
                        "ID677594": {
                            "person": {"id": 677594, "fullName": "Julio Rodríguez"},
                            "position": {"abbreviation": "CF"},
                            "stats": {"batting": {"gamesPlayed": 1, "atBats": at_bats, "hits": hits}}
                        }
                    }
                },
                "home": {"team": {"id": 140 + game_pk % 2}, "players": {}}
            }
        })
    }

    fn pitcher_game(innings: &str, earned_runs: u32) -> serde_json::Value {
        json!({
            "teams": {
                "away": {"team": {"id": 147}, "players": {}},
                "home": {
                    "team": {"id": 136, "abbreviation": "SEA"},
                    "players": {
                        "ID669302": {
                            "person": {"id": 669302, "fullName": "Logan Gilbert"},
                            "position": {"abbreviation": "P"},
                            "stats": {
                                "pitching": {"gamesPlayed": 1, "inningsPitched": innings, "earnedRuns": earned_runs}
                            }
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn test_is_final() {
        let now = Utc.with_ymd_and_hms(2024, 6, 2, 3, 0, 0).unwrap();
        assert!(!is_final(date(), now));

        let later = Utc.with_ymd_and_hms(2024, 6, 2, 13, 0, 0).unwrap();
        assert!(is_final(date(), later));

        assert!(!is_final(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(), later));
    }

    #[tokio::test]
    async fn test_doubleheader_average_uses_summed_components() {
        let mut boxscores = HashMap::new();
        boxscores.insert(1, batter_game(1, 3, 1));
        boxscores.insert(2, batter_game(2, 2, 1));

        let (_, aggregator) = aggregator(FakeStatsApi {
            bulk_error: Some(ProviderError::Status { url: "stats".to_string(), status: 503 }),
            games: vec![1, 2],
            boxscores,
            ..Default::default()
        });

        let day = aggregator.daily_stats(date()).await.unwrap();
        let julio = day.get(&677594).unwrap();
        assert_eq!(julio.totals.hitting.at_bats, 5);
        assert_eq!(julio.totals.hitting.hits, 2);
        assert_eq!(julio.totals.games, 2);
        assert!((julio.rates.avg - 0.4).abs() < 1e-12);
        assert_eq!(julio.team, "SEA");
    }

    #[tokio::test]
    async fn test_bulk_feed_merges_stat_groups() {
        let (api, aggregator) = aggregator(FakeStatsApi {
            hitting: vec![json!({
                "stat": {"gamesPlayed": 1, "atBats": 4, "hits": 1, "homeRuns": 1, "rbi": 2, "runs": 1},
                "player": {"id": 660271, "fullName": "Shohei Ohtani"},
                "team": {"id": 119},
                "position": {"abbreviation": "DH"}
            })],
            pitching: vec![json!({
                "stat": {
                    "gamesPlayed": 1, "inningsPitched": "6.0", "earnedRuns": 1, "hits": 4,
                    "baseOnBalls": 2, "strikeOuts": 9, "wins": 1
                },
                "player": {"id": 660271, "fullName": "Shohei Ohtani"},
                "team": {"id": 119},
                "position": {"abbreviation": "P"}
            })],
            ..Default::default()
        });

        let day = aggregator.daily_stats(date()).await.unwrap();
        let ohtani = day.get(&660271).unwrap();

        assert_eq!(ohtani.team, "LAD");
        assert_eq!(ohtani.position, "DH");
        assert_eq!(ohtani.totals.games, 1);
        assert_eq!(ohtani.totals.hitting.home_runs, 1);
        assert_eq!(ohtani.totals.pitching.outs, 18);
        assert_eq!(ohtani.totals.pitching.quality_starts, 1);
        assert!((ohtani.rates.era - 1.5).abs() < 1e-12);
        assert!((ohtani.rates.whip - 1.0).abs() < 1e-12);
        assert_eq!(api.boxscore_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_two_start_day_counts_quality_starts_per_game() {
        let mut boxscores = HashMap::new();
        boxscores.insert(1, pitcher_game("6.0", 3));
        boxscores.insert(2, pitcher_game("6.0", 3));

        let (api, aggregator) = aggregator(FakeStatsApi {
            pitching: vec![json!({
                "stat": {"gamesPitched": 2, "inningsPitched": "12.0", "earnedRuns": 6},
                "player": {"id": 669302, "fullName": "Logan Gilbert"},
                "team": {"id": 136},
                "position": {"abbreviation": "P"}
            })],
            games: vec![1, 2],
            boxscores,
            ..Default::default()
        });

        let day = aggregator.daily_stats(date()).await.unwrap();
        let gilbert = day.get(&669302).unwrap();
        assert_eq!(gilbert.totals.pitching.quality_starts, 2);
        assert_eq!(gilbert.totals.pitching.outs, 36);
        assert_eq!(gilbert.totals.pitching.earned_runs, 6);
        assert_eq!(gilbert.totals.games, 2);
        assert_eq!(api.boxscore_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_split_short_outings_are_not_a_quality_start() {
        let mut boxscores = HashMap::new();
        boxscores.insert(1, pitcher_game("3.0", 0));
        boxscores.insert(2, pitcher_game("3.0", 0));

        let (_, aggregator) = aggregator(FakeStatsApi {
            pitching: vec![json!({
                "stat": {"gamesPitched": 2, "inningsPitched": "6.0", "earnedRuns": 0},
                "player": {"id": 669302, "fullName": "Logan Gilbert"},
                "team": {"id": 136}
            })],
            games: vec![1, 2],
            boxscores,
            ..Default::default()
        });

        let day = aggregator.daily_stats(date()).await.unwrap();
        assert_eq!(day[&669302].totals.pitching.quality_starts, 0);
        assert_eq!(day[&669302].totals.pitching.outs, 18);
    }

    #[tokio::test]
    async fn test_past_dates_are_memoized() {
        let (api, aggregator) = aggregator(FakeStatsApi {
            hitting: vec![json!({
                "stat": {"gamesPlayed": 1, "atBats": 4, "hits": 2},
                "player": {"id": 1, "fullName": "A Batter"}
            })],
            ..Default::default()
        });

        let first = aggregator.daily_stats(date()).await.unwrap();
        let second = aggregator.daily_stats(date()).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(api.bulk_calls.load(Ordering::SeqCst), 1);
        assert_eq!(aggregator.cache_stats().hits, 1);
    }

    #[tokio::test]
    async fn test_all_feeds_failing_surfaces_last_error() {
        let (_, aggregator) = aggregator(FakeStatsApi {
            bulk_error: Some(ProviderError::Status { url: "stats".to_string(), status: 500 }),
            games: vec![9],
            ..Default::default()
        });

        let err = aggregator.daily_stats(date()).await.unwrap_err();
        assert_eq!(err, ProviderError::NotFound("game 9".to_string()));

        // failures are not cached
        assert_eq!(aggregator.cache_stats().entries, 0);
    }

    #[tokio::test]
    async fn test_empty_feed_then_failed_feed_is_not_cached_as_empty() {
        let (api, aggregator) = aggregator(FakeStatsApi {
            games: vec![4],
            boxscore_error: Some(ProviderError::Transport {
                url: "boxscore".to_string(),
                message: "timed out".to_string(),
            }),
            ..Default::default()
        });

        let err = aggregator.daily_stats(date()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport { .. }));
        assert_eq!(aggregator.cache_stats().entries, 0);

        // the next request goes back upstream
        assert!(aggregator.daily_stats(date()).await.is_err());
        assert_eq!(api.bulk_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_off_day_is_empty_not_error() {
        let (_, aggregator) = aggregator(FakeStatsApi::default());
        let day = aggregator.daily_stats(date()).await.unwrap();
        assert!(day.is_empty());
    }

    #[tokio::test]
    async fn test_search_is_cached_by_normalized_query() {
        let (api, aggregator) = aggregator(FakeStatsApi {
            people: vec![PlayerCandidate {
                player_id: 545361,
                name: "Mike Trout".to_string(),
                team: "LAA".to_string(),
                position: "CF".to_string(),
            }],
            ..Default::default()
        });

        let first = aggregator.search_players("Mike Trout").await.unwrap();
        let second = aggregator.search_players(" mike trout ").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(api.search_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_accumulate_is_order_independent() {
        let appearance = |outs, er| PlayerAppearance {
            player_id: 7,
            name: "Arm".to_string(),
            team: "SEA".to_string(),
            position: "P".to_string(),
            hitting: Default::default(),
            pitching: league_core::PitchingLine { outs, earned_runs: er, ..Default::default() },
            games: 1,
        };

        let forward = accumulate(date(), vec![appearance(15, 2), appearance(12, 1)]);
        let backward = accumulate(date(), vec![appearance(12, 1), appearance(15, 2)]);
        assert_eq!(forward, backward);
        assert!((forward[&7].rates.era - 3.0).abs() < 1e-12);
    }
}
