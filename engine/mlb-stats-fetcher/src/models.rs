//! Raw statistics provider payloads
//!
//! These mirror the upstream JSON and never leave this crate; the feeds turn
//! them into `PlayerAppearance` values.

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IdRef {
    pub id: u64,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PositionRef {
    #[serde(default)]
    pub abbreviation: Option<String>,
}

/// Batting counts as the provider reports them
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BattingStats {
    pub games_played: Option<u32>,
    pub at_bats: Option<u32>,
    pub runs: Option<u32>,
    pub hits: Option<u32>,
    pub home_runs: Option<u32>,
    pub rbi: Option<u32>,
    pub stolen_bases: Option<u32>,
}

/// Pitching counts; innings use "6.2" notation
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PitchingStats {
    pub games_played: Option<u32>,
    pub games_pitched: Option<u32>,
    pub innings_pitched: Option<String>,
    pub earned_runs: Option<u32>,
    pub hits: Option<u32>,
    pub base_on_balls: Option<u32>,
    pub strike_outs: Option<u32>,
    pub wins: Option<u32>,
    pub saves: Option<u32>,
}

// ---- /api/v1/stats (bulk per-date stat groups) ----

#[derive(Debug, Clone, Deserialize)]
#[serde(bound = "S: Deserialize<'de>")]
pub struct StatsResponse<S> {
    #[serde(default = "Vec::new")]
    pub stats: Vec<StatGroup<S>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound = "S: Deserialize<'de>")]
pub struct StatGroup<S> {
    #[serde(default = "Vec::new")]
    pub splits: Vec<Split<S>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Split<S> {
    pub stat: S,
    pub player: IdRef,
    #[serde(default)]
    pub team: Option<IdRef>,
    #[serde(default)]
    pub position: Option<PositionRef>,
}

// ---- /api/v1/schedule ----

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub dates: Vec<ScheduleDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleDate {
    #[serde(default)]
    pub games: Vec<ScheduledGame>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledGame {
    pub game_pk: u64,
    #[serde(default)]
    pub status: GameStatus,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStatus {
    pub abstract_game_state: Option<String>,
    pub detailed_state: Option<String>,
}

impl ScheduledGame {
    /// Games that can have produced box-score lines
    pub fn has_started(&self) -> bool {
        let abstract_state = self.status.abstract_game_state.as_deref().unwrap_or("");
        let detailed = self.status.detailed_state.as_deref().unwrap_or("");
        abstract_state != "Preview" && !matches!(detailed, "Postponed" | "Cancelled")
    }
}

// ---- /api/v1/game/{gamePk}/boxscore ----

#[derive(Debug, Clone, Deserialize)]
pub struct BoxscoreResponse {
    pub teams: BoxscoreTeams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoxscoreTeams {
    pub away: BoxscoreTeam,
    pub home: BoxscoreTeam,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoxscoreTeam {
    pub team: IdRef,
    /// Keyed "ID<personId>"
    #[serde(default)]
    pub players: HashMap<String, BoxscorePlayer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoxscorePlayer {
    pub person: IdRef,
    #[serde(default)]
    pub position: Option<PositionRef>,
    #[serde(default)]
    pub stats: BoxscorePlayerStats,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct BoxscorePlayerStats {
    pub batting: Option<BattingStats>,
    pub pitching: Option<PitchingStats>,
}

// ---- /api/v1/people/search ----

#[derive(Debug, Clone, Deserialize)]
pub struct PeopleResponse {
    #[serde(default)]
    pub people: Vec<Person>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: u64,
    pub full_name: String,
    #[serde(default)]
    pub current_team: Option<IdRef>,
    #[serde(default)]
    pub primary_position: Option<PositionRef>,
}

/// Club code for a provider team id
pub fn team_code(team_id: u64) -> Option<&'static str> {
    let code = match team_id {
        108 => "LAA",
        109 => "ARI",
        110 => "BAL",
        111 => "BOS",
        112 => "CHC",
        113 => "CIN",
        114 => "CLE",
        115 => "COL",
        116 => "DET",
        117 => "HOU",
        118 => "KC",
        119 => "LAD",
        120 => "WSH",
        121 => "NYM",
        133 => "ATH",
        134 => "PIT",
        135 => "SD",
        136 => "SEA",
        137 => "SF",
        138 => "STL",
        139 => "TB",
        140 => "TEX",
        141 => "TOR",
        142 => "MIN",
        143 => "PHI",
        144 => "ATL",
        145 => "CHW",
        146 => "MIA",
        147 => "NYY",
        158 => "MIL",
        _ => return None,
    };
    Some(code)
}

/// Abbreviation from the payload, else from the id table, else empty
pub fn team_abbreviation(team: Option<&IdRef>) -> String {
    match team {
        Some(IdRef { abbreviation: Some(abbr), .. }) if !abbr.is_empty() => abbr.clone(),
        Some(team) => team_code(team.id).unwrap_or_default().to_string(),
        None => String::new(),
    }
}
