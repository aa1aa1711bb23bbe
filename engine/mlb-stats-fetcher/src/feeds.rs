//! Daily feed strategies
//!
//! Each feed turns one calendar date into a flat list of per-appearance
//! lines. The aggregator tries the configured feeds in order and sums
//! whatever the first successful one returns.

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::try_join_all;
use league_core::{HittingLine, PitchingLine, ProviderError, StatsPlayerId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::client::StatsApi;
use crate::models::{team_abbreviation, BattingStats, BoxscoreTeam, PitchingStats, Split};

pub const BULK_STATS_FEED: &str = "bulk-stats";
pub const BOXSCORES_FEED: &str = "boxscores";

const SOURCE_NAME: &str = "mlb-stats-api";

/// One player's line from one appearance (or one bulk day split)
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerAppearance {
    pub player_id: StatsPlayerId,
    pub name: String,
    pub team: String,
    pub position: String,
    pub hitting: HittingLine,
    pub pitching: PitchingLine,
    pub games: u32,
}

/// A named way of producing a date's appearances
#[async_trait]
pub trait DailyFeed: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, date: NaiveDate) -> Result<Vec<PlayerAppearance>, ProviderError>;
}

/// Build the feeds named in configuration, in order
pub fn feeds_from_names(
    names: &[String],
    api: Arc<dyn StatsApi>,
) -> Result<Vec<Arc<dyn DailyFeed>>, ProviderError> {
    names
        .iter()
        .map(|name| -> Result<Arc<dyn DailyFeed>, ProviderError> {
            match name.as_str() {
                BULK_STATS_FEED => Ok(Arc::new(BulkStatsFeed::new(api.clone()))),
                BOXSCORES_FEED => Ok(Arc::new(BoxscoreFeed::new(api.clone()))),
                other => Err(ProviderError::Unavailable(format!("Unknown daily feed '{other}'"))),
            }
        })
        .collect()
}

/// Parse box-score innings notation ("6.2" = six innings and two outs) into outs
pub fn parse_outs(innings: &str) -> Result<u32, ProviderError> {
    let innings = innings.trim();
    if innings.is_empty() {
        return Ok(0);
    }

    let bad = || ProviderError::format(SOURCE_NAME, format!("invalid innings value '{innings}'"));
    let (whole, partial) = match innings.split_once('.') {
        Some((whole, partial)) => (whole, partial),
        None => (innings, "0"),
    };

    let whole: u32 = whole.parse().map_err(|_| bad())?;
    let partial: u32 = partial.parse().map_err(|_| bad())?;
    if partial > 2 {
        return Err(bad());
    }
    whole.checked_mul(3).and_then(|outs| outs.checked_add(partial)).ok_or_else(bad)
}

fn hitting_line(stats: &BattingStats) -> HittingLine {
    HittingLine {
        at_bats: stats.at_bats.unwrap_or(0),
        runs: stats.runs.unwrap_or(0),
        hits: stats.hits.unwrap_or(0),
        home_runs: stats.home_runs.unwrap_or(0),
        rbi: stats.rbi.unwrap_or(0),
        stolen_bases: stats.stolen_bases.unwrap_or(0),
    }
}

/// Pitching line for one appearance, including its quality-start flag
fn pitching_line(stats: &PitchingStats) -> Result<PitchingLine, ProviderError> {
    let mut line = PitchingLine {
        outs: parse_outs(stats.innings_pitched.as_deref().unwrap_or(""))?,
        earned_runs: stats.earned_runs.unwrap_or(0),
        hits_allowed: stats.hits.unwrap_or(0),
        walks: stats.base_on_balls.unwrap_or(0),
        strikeouts: stats.strike_outs.unwrap_or(0),
        wins: stats.wins.unwrap_or(0),
        saves: stats.saves.unwrap_or(0),
        quality_starts: 0,
    };
    if line.is_quality_start() {
        line.quality_starts = 1;
    }
    Ok(line)
}

fn batting_appeared(stats: &BattingStats) -> bool {
    stats.games_played.unwrap_or(0) > 0 || !hitting_line(stats).is_empty()
}

fn pitching_appeared(stats: &PitchingStats) -> bool {
    stats.games_played.unwrap_or(0) > 0
        || stats.games_pitched.unwrap_or(0) > 0
        || stats.innings_pitched.as_deref().map_or(false, |ip| !ip.trim().is_empty())
}

/// Per-date hitting and pitching stat groups, merged per player
pub struct BulkStatsFeed {
    api: Arc<dyn StatsApi>,
}

impl BulkStatsFeed {
    pub fn new(api: Arc<dyn StatsApi>) -> Self {
        Self { api }
    }

    fn appearance<S>(split: &Split<S>) -> PlayerAppearance {
        PlayerAppearance {
            player_id: split.player.id,
            name: split.player.full_name.clone().unwrap_or_default(),
            team: team_abbreviation(split.team.as_ref()),
            position: split.position.as_ref().and_then(|p| p.abbreviation.clone()).unwrap_or_default(),
            hitting: HittingLine::default(),
            pitching: PitchingLine::default(),
            games: 0,
        }
    }
}

#[async_trait]
impl DailyFeed for BulkStatsFeed {
    fn name(&self) -> &str {
        BULK_STATS_FEED
    }

    async fn fetch(&self, date: NaiveDate) -> Result<Vec<PlayerAppearance>, ProviderError> {
        let (hitting, pitching) =
            futures::try_join!(self.api.hitting_by_date(date), self.api.pitching_by_date(date))?;

        let mut merged: BTreeMap<StatsPlayerId, PlayerAppearance> = BTreeMap::new();

        for split in &hitting {
            let line = Self::appearance(split);
            let entry = merged.entry(split.player.id).or_insert(line);
            entry.hitting += hitting_line(&split.stat);
            entry.games = entry.games.max(split.stat.games_played.unwrap_or(1));
        }

        // a summed multi-game line cannot be tested for quality starts
        if let Some(split) = pitching.iter().find(|s| s.stat.games_pitched.unwrap_or(0) > 1) {
            return Err(ProviderError::Unavailable(format!(
                "player {} pitched {} games on {}, per-game lines required",
                split.player.id,
                split.stat.games_pitched.unwrap_or(0),
                date
            )));
        }

        for split in &pitching {
            let line = Self::appearance(split);
            let entry = merged.entry(split.player.id).or_insert(line);
            entry.pitching += pitching_line(&split.stat)?;
            let games = split.stat.games_pitched.or(split.stat.games_played).unwrap_or(1);
            entry.games = entry.games.max(games);
            // two-way players report "P" in the pitching group only
            if entry.position.is_empty() {
                entry.position = split.position.as_ref().and_then(|p| p.abbreviation.clone()).unwrap_or_default();
            }
        }

        debug!(
            "Bulk feed for {}: {} hitting splits, {} pitching splits, {} players",
            date,
            hitting.len(),
            pitching.len(),
            merged.len()
        );
        Ok(merged.into_values().collect())
    }
}

/// Schedule for the date, then every started game's box score
pub struct BoxscoreFeed {
    api: Arc<dyn StatsApi>,
}

impl BoxscoreFeed {
    pub fn new(api: Arc<dyn StatsApi>) -> Self {
        Self { api }
    }

    /// One appearance per player who batted or pitched for this side
    fn side_appearances(side: &BoxscoreTeam) -> Result<Vec<PlayerAppearance>, ProviderError> {
        let team = team_abbreviation(Some(&side.team));
        let mut appearances = Vec::new();

        for player in side.players.values() {
            let batting = player.stats.batting.as_ref().filter(|b| batting_appeared(b));
            let pitching = player.stats.pitching.as_ref().filter(|p| pitching_appeared(p));
            if batting.is_none() && pitching.is_none() {
                continue;
            }

            appearances.push(PlayerAppearance {
                player_id: player.person.id,
                name: player.person.full_name.clone().unwrap_or_default(),
                team: team.clone(),
                position: player.position.as_ref().and_then(|p| p.abbreviation.clone()).unwrap_or_default(),
                hitting: batting.map(hitting_line).unwrap_or_default(),
                pitching: pitching.map(pitching_line).transpose()?.unwrap_or_default(),
                games: 1,
            });
        }

        Ok(appearances)
    }
}

#[async_trait]
impl DailyFeed for BoxscoreFeed {
    fn name(&self) -> &str {
        BOXSCORES_FEED
    }

    async fn fetch(&self, date: NaiveDate) -> Result<Vec<PlayerAppearance>, ProviderError> {
        let games = self.api.schedule(date).await?;
        let started: Vec<u64> = games.iter().filter(|g| g.has_started()).map(|g| g.game_pk).collect();

        let boxscores = try_join_all(started.iter().map(|game_pk| self.api.boxscore(*game_pk))).await?;

        let mut appearances = Vec::new();
        for boxscore in &boxscores {
            appearances.extend(Self::side_appearances(&boxscore.teams.away)?);
            appearances.extend(Self::side_appearances(&boxscore.teams.home)?);
        }

        info!(
            "Box score feed for {}: {} games, {} appearances",
            date,
            boxscores.len(),
            appearances.len()
        );
        Ok(appearances)
    }
}
