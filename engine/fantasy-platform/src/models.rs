//! League roster view payload (`view=mRoster`)

use league_core::{PlayerStatus, RosterEntry, TeamId};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueRosterResponse {
    #[serde(default)]
    pub teams: Vec<PlatformTeam>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformTeam {
    pub id: TeamId,
    #[serde(default)]
    pub roster: Option<PlatformRoster>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PlatformRoster {
    #[serde(default)]
    pub entries: Vec<PlatformRosterEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformRosterEntry {
    pub player_id: i64,
    pub lineup_slot_id: u32,
    #[serde(default)]
    pub injury_status: Option<String>,
    pub player_pool_entry: PlayerPoolEntry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerPoolEntry {
    pub player: PlatformPlayer,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformPlayer {
    pub full_name: String,
    #[serde(default)]
    pub pro_team_id: u32,
    #[serde(default)]
    pub default_position_id: u32,
    #[serde(default)]
    pub eligible_slots: Vec<u32>,
    #[serde(default)]
    pub injury_status: Option<String>,
}

/// Club code for the platform's pro team id (0 = free agent)
pub fn pro_team_code(pro_team_id: u32) -> &'static str {
    match pro_team_id {
        1 => "BAL",
        2 => "BOS",
        3 => "LAA",
        4 => "CHW",
        5 => "CLE",
        6 => "DET",
        7 => "KC",
        8 => "MIL",
        9 => "MIN",
        10 => "NYY",
        11 => "ATH",
        12 => "SEA",
        13 => "TEX",
        14 => "TOR",
        15 => "ATL",
        16 => "CHC",
        17 => "CIN",
        18 => "HOU",
        19 => "LAD",
        20 => "WSH",
        21 => "NYM",
        22 => "PHI",
        23 => "PIT",
        24 => "STL",
        25 => "SD",
        26 => "SF",
        27 => "COL",
        28 => "MIA",
        29 => "ARI",
        30 => "TB",
        _ => "FA",
    }
}

/// Position code for the platform's default position id
pub fn position_code(default_position_id: u32) -> &'static str {
    match default_position_id {
        1 => "SP",
        2 => "C",
        3 => "1B",
        4 => "2B",
        5 => "3B",
        6 => "SS",
        7 => "LF",
        8 => "CF",
        9 => "RF",
        10 => "DH",
        11 => "RP",
        14 => "TWP",
        _ => "",
    }
}

impl PlatformRosterEntry {
    /// Normalize into the shared roster record
    pub fn into_roster_entry(self) -> RosterEntry {
        let player = self.player_pool_entry.player;
        let status = self.injury_status.as_deref().or(player.injury_status.as_deref());

        RosterEntry {
            player_id: self.player_id,
            status: PlayerStatus::from_platform(status),
            name: player.full_name,
            pro_team: pro_team_code(player.pro_team_id).to_string(),
            position: position_code(player.default_position_id).to_string(),
            lineup_slot_id: self.lineup_slot_id,
            eligible_slots: player.eligible_slots,
        }
    }
}
