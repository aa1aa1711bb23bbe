use league_core::{PlatformPlayerId, PlayerCandidate, RosterEntry, StatsPlayerId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::normalize::{is_known_team, normalize_name, TeamAliases};
use crate::positions::{position_fit, PositionFit};
use crate::similarity::name_similarity;

/// Starting confidence for an identical normalized name
pub const EXACT_BASE_CONFIDENCE: f64 = 0.9;
pub const EXACT_TEAM_MATCH_BONUS: f64 = 0.1;
pub const EXACT_TEAM_MISMATCH_PENALTY: f64 = 0.2;

/// Exact-stage results at or above this skip the fuzzy stage
pub const EXACT_ACCEPT_THRESHOLD: f64 = 0.8;

pub const FUZZY_NAME_WEIGHT: f64 = 0.7;
pub const FUZZY_TEAM_MATCH_BONUS: f64 = 0.2;
pub const FUZZY_TEAM_MISMATCH_PENALTY: f64 = 0.1;
pub const FUZZY_POSITION_BONUS: f64 = 0.1;

/// A fuzzy candidate must score strictly above this to be considered
pub const FUZZY_FLOOR: f64 = 0.5;

/// Matches below this are flagged when fed into weekly totals
pub const WEEKLY_SAFE_CONFIDENCE: f64 = 0.7;

/// Matches below this should not be shown as linked
pub const DISPLAY_SAFE_CONFIDENCE: f64 = 0.5;

const SCORE_EPSILON: f64 = 1e-9;

pub const REASON_EXACT: &str = "exact name match";
pub const REASON_OVERRIDE: &str = "manual override";
pub const REASON_NO_MATCH: &str = "no match";

/// Resolver configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Platform player ID -> statistics provider ID pinned by hand
    #[serde(default)]
    pub overrides: HashMap<PlatformPlayerId, StatsPlayerId>,

    /// Extra `alias -> canonical` club codes on top of the built-in table
    #[serde(default)]
    pub extra_team_aliases: HashMap<String, String>,
}

/// Outcome of resolving one roster entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerMatch {
    pub entry: RosterEntry,
    pub candidate: Option<PlayerCandidate>,
    pub confidence: f64,
    pub reason: String,
    pub warnings: Vec<String>,
}

impl PlayerMatch {
    fn unmatched(entry: &RosterEntry) -> Self {
        Self {
            entry: entry.clone(),
            candidate: None,
            confidence: 0.0,
            reason: REASON_NO_MATCH.to_string(),
            warnings: Vec::new(),
        }
    }

    pub fn is_matched(&self) -> bool {
        self.candidate.is_some()
    }

    pub fn stats_player_id(&self) -> Option<StatsPlayerId> {
        self.candidate.as_ref().map(|c| c.player_id)
    }

    pub fn is_weekly_safe(&self) -> bool {
        self.is_matched() && self.confidence >= WEEKLY_SAFE_CONFIDENCE
    }

    pub fn is_display_safe(&self) -> bool {
        self.is_matched() && self.confidence >= DISPLAY_SAFE_CONFIDENCE
    }
}

struct PreparedCandidate<'a> {
    candidate: &'a PlayerCandidate,
    name: String,
    team: String,
}

struct Scored {
    index: usize,
    confidence: f64,
    reason: String,
    warnings: Vec<String>,
}

enum TeamFit {
    Match,
    Mismatch,
    Unknown,
}

/// Maps fantasy roster entries onto statistics provider players
///
/// Each candidate is claimed by at most one roster entry per call, and
/// entries are processed in roster order so the same inputs always produce
/// the same assignment.
#[derive(Debug, Clone)]
pub struct PlayerResolver {
    overrides: HashMap<PlatformPlayerId, StatsPlayerId>,
    teams: TeamAliases,
}

impl Default for PlayerResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl PlayerResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { teams: TeamAliases::new(&config.extra_team_aliases), overrides: config.overrides }
    }

    /// Canonical club code for `code`
    pub fn normalize_team(&self, code: &str) -> String {
        self.teams.normalize(code)
    }

    /// Resolve every entry against the candidate pool, one result per entry in input order
    pub fn resolve(&self, entries: &[RosterEntry], candidates: &[PlayerCandidate]) -> Vec<PlayerMatch> {
        let pool: Vec<PreparedCandidate<'_>> = candidates
            .iter()
            .map(|c| PreparedCandidate {
                candidate: c,
                name: normalize_name(&c.name),
                team: self.teams.normalize(&c.team),
            })
            .collect();

        let mut claimed: HashSet<StatsPlayerId> = HashSet::new();
        let matches: Vec<PlayerMatch> =
            entries.iter().map(|entry| self.resolve_entry(entry, &pool, &mut claimed)).collect();

        let matched = matches.iter().filter(|m| m.is_matched()).count();
        info!(
            "Resolved {}/{} roster entries against {} candidates",
            matched,
            entries.len(),
            candidates.len()
        );
        matches
    }

    /// Resolve a single entry with nothing claimed
    pub fn resolve_one(&self, entry: &RosterEntry, candidates: &[PlayerCandidate]) -> PlayerMatch {
        let mut matches = self.resolve(std::slice::from_ref(entry), candidates);
        matches.pop().unwrap_or_else(|| PlayerMatch::unmatched(entry))
    }

    fn resolve_entry(
        &self,
        entry: &RosterEntry,
        pool: &[PreparedCandidate<'_>],
        claimed: &mut HashSet<StatsPlayerId>,
    ) -> PlayerMatch {
        if let Some(pinned) = self.overrides.get(&entry.player_id) {
            let found = pool
                .iter()
                .find(|c| c.candidate.player_id == *pinned && !claimed.contains(pinned));
            if let Some(found) = found {
                claimed.insert(*pinned);
                debug!("{} -> {} via override", entry.name, pinned);
                return PlayerMatch {
                    entry: entry.clone(),
                    candidate: Some(found.candidate.clone()),
                    confidence: 1.0,
                    reason: REASON_OVERRIDE.to_string(),
                    warnings: Vec::new(),
                };
            }
        }

        let name = normalize_name(&entry.name);
        if name.is_empty() {
            return PlayerMatch::unmatched(entry);
        }
        let team = self.teams.normalize(&entry.pro_team);

        let available = || {
            pool.iter()
                .enumerate()
                .filter(|(_, c)| !claimed.contains(&c.candidate.player_id))
        };

        let mut best: Option<Scored> = None;

        for (index, candidate) in available().filter(|(_, c)| c.name == name) {
            let mut warnings = Vec::new();
            let mut confidence = EXACT_BASE_CONFIDENCE;
            match team_fit(&team, &candidate.team) {
                TeamFit::Match => confidence += EXACT_TEAM_MATCH_BONUS,
                TeamFit::Mismatch => {
                    confidence -= EXACT_TEAM_MISMATCH_PENALTY;
                    warnings.push(team_warning(&team, &candidate.team));
                }
                TeamFit::Unknown => {}
            }
            if position_fit(&entry.position, &candidate.candidate.position) == PositionFit::Incompatible {
                warnings.push(position_warning(entry, candidate.candidate));
            }

            let confidence = confidence.clamp(0.0, 1.0);
            if best.as_ref().map_or(true, |b| confidence > b.confidence + SCORE_EPSILON) {
                best = Some(Scored { index, confidence, reason: REASON_EXACT.to_string(), warnings });
            }
        }

        if best.as_ref().map_or(true, |b| b.confidence < EXACT_ACCEPT_THRESHOLD) {
            for (index, candidate) in available() {
                let similarity = name_similarity(&name, &candidate.name);
                let mut warnings = Vec::new();
                let mut confidence = similarity * FUZZY_NAME_WEIGHT;
                match team_fit(&team, &candidate.team) {
                    TeamFit::Match => confidence += FUZZY_TEAM_MATCH_BONUS,
                    TeamFit::Mismatch => {
                        confidence -= FUZZY_TEAM_MISMATCH_PENALTY;
                        warnings.push(team_warning(&team, &candidate.team));
                    }
                    TeamFit::Unknown => {}
                }
                match position_fit(&entry.position, &candidate.candidate.position) {
                    PositionFit::Compatible => confidence += FUZZY_POSITION_BONUS,
                    PositionFit::Incompatible => warnings.push(position_warning(entry, candidate.candidate)),
                    PositionFit::Unknown => {}
                }

                let confidence = confidence.clamp(0.0, 1.0);
                let current = best.as_ref().map_or(0.0, |b| b.confidence);
                if confidence > current + SCORE_EPSILON && confidence > FUZZY_FLOOR {
                    best = Some(Scored {
                        index,
                        confidence,
                        reason: format!("fuzzy name match (similarity {:.2})", similarity),
                        warnings,
                    });
                }
            }
        }

        match best {
            Some(scored) => {
                let candidate = pool[scored.index].candidate.clone();
                claimed.insert(candidate.player_id);
                debug!(
                    "{} -> {} ({}) confidence {:.2}: {}",
                    entry.name, candidate.name, candidate.player_id, scored.confidence, scored.reason
                );
                PlayerMatch {
                    entry: entry.clone(),
                    candidate: Some(candidate),
                    confidence: scored.confidence,
                    reason: scored.reason,
                    warnings: scored.warnings,
                }
            }
            None => {
                debug!("No candidate for {} ({})", entry.name, entry.pro_team);
                PlayerMatch::unmatched(entry)
            }
        }
    }
}

fn team_fit(roster_team: &str, candidate_team: &str) -> TeamFit {
    if !is_known_team(roster_team) || !is_known_team(candidate_team) {
        TeamFit::Unknown
    } else if roster_team == candidate_team {
        TeamFit::Match
    } else {
        TeamFit::Mismatch
    }
}

fn team_warning(roster_team: &str, candidate_team: &str) -> String {
    format!("team mismatch: roster {} vs stats {}", roster_team, candidate_team)
}

fn position_warning(entry: &RosterEntry, candidate: &PlayerCandidate) -> String {
    format!("position mismatch: roster {} vs stats {}", entry.position, candidate.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_core::PlayerStatus;

    fn entry(id: i64, name: &str, team: &str, position: &str) -> RosterEntry {
        RosterEntry {
            player_id: id,
            name: name.to_string(),
            pro_team: team.to_string(),
            position: position.to_string(),
            lineup_slot_id: 0,
            status: PlayerStatus::Active,
            eligible_slots: vec![],
        }
    }

    fn candidate(id: u64, name: &str, team: &str, position: &str) -> PlayerCandidate {
        PlayerCandidate {
            player_id: id,
            name: name.to_string(),
            team: team.to_string(),
            position: position.to_string(),
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_exact_match_with_team() {
        let resolver = PlayerResolver::default();
        let result = resolver.resolve_one(
            &entry(1, "Julio Rodríguez", "SEA", "OF"),
            &[candidate(677594, "Julio Rodriguez", "SEA", "CF")],
        );

        assert_eq!(result.stats_player_id(), Some(677594));
        assert!(close(result.confidence, 1.0));
        assert_eq!(result.reason, REASON_EXACT);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_team_mismatch_lowers_exact_confidence() {
        let resolver = PlayerResolver::default();
        let result = resolver.resolve_one(
            &entry(1, "Luis Garcia", "HOU", "SP"),
            &[candidate(10, "Luis Garcia", "SD", "P")],
        );

        assert_eq!(result.stats_player_id(), Some(10));
        assert!(close(result.confidence, 0.7), "confidence = {}", result.confidence);
        assert_eq!(result.reason, REASON_EXACT);
        assert!(result.warnings.iter().any(|w| w.starts_with("team mismatch")));
        assert!(result.is_weekly_safe());
    }

    #[test]
    fn test_team_alias_counts_as_match() {
        let resolver = PlayerResolver::default();
        let result = resolver.resolve_one(
            &entry(1, "Luis Robert", "CWS", "OF"),
            &[candidate(7, "Luis Robert", "CHW", "CF")],
        );
        assert!(close(result.confidence, 1.0));
    }

    #[test]
    fn test_unknown_team_is_neutral() {
        let resolver = PlayerResolver::default();
        let result =
            resolver.resolve_one(&entry(1, "Jose Abreu", "FA", "1B"), &[candidate(3, "Jose Abreu", "HOU", "1B")]);
        assert!(close(result.confidence, 0.9));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_position_mismatch_warns_only() {
        let resolver = PlayerResolver::default();
        let result = resolver.resolve_one(
            &entry(1, "Will Smith", "LAD", "C"),
            &[candidate(5, "Will Smith", "LAD", "P")],
        );
        assert!(close(result.confidence, 1.0));
        assert!(result.warnings.iter().any(|w| w.starts_with("position mismatch")));
    }

    #[test]
    fn test_fuzzy_match_ignores_suffix() {
        let resolver = PlayerResolver::default();
        let result = resolver.resolve_one(
            &entry(1, "Michael Harris II", "ATL", "OF"),
            &[candidate(20, "Ozzie Albies", "ATL", "2B"), candidate(21, "Michael Harris", "ATL", "CF")],
        );

        assert_eq!(result.stats_player_id(), Some(21));
        assert!(result.reason.starts_with("fuzzy name match"));
        assert!(close(result.confidence, 1.0), "confidence = {}", result.confidence);
    }

    #[test]
    fn test_unrelated_names_do_not_match() {
        let resolver = PlayerResolver::default();
        let result = resolver.resolve_one(
            &entry(1, "Mike Trout", "LAA", "OF"),
            &[candidate(30, "Shohei Ohtani", "LAD", "DH")],
        );

        assert!(!result.is_matched());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.reason, REASON_NO_MATCH);
        assert!(!result.is_display_safe());
        assert!(!result.is_weekly_safe());
    }

    #[test]
    fn test_weak_fuzzy_match_is_display_safe_only() {
        let resolver = PlayerResolver::default();
        let result = resolver.resolve_one(
            &entry(1, "Mike Trout", "LAA", "OF"),
            &[candidate(9, "Michael Trout", "NYY", "CF")],
        );

        assert!(result.is_matched());
        assert!(result.is_display_safe());
        assert!(!result.is_weekly_safe(), "confidence = {}", result.confidence);
    }

    #[test]
    fn test_candidates_are_claimed_once() {
        let resolver = PlayerResolver::default();
        let entries = vec![
            entry(1, "Will Smith", "LAD", "C"),
            entry(2, "Will Smith", "LAD", "C"),
            entry(3, "Will Smith", "TEX", "RP"),
        ];
        let candidates = vec![candidate(100, "Will Smith", "TEX", "P"), candidate(200, "Will Smith", "LAD", "C")];

        let matches = resolver.resolve(&entries, &candidates);
        assert_eq!(matches.len(), 3);

        let ids: Vec<_> = matches.iter().map(|m| m.stats_player_id()).collect();
        assert_eq!(ids[0], Some(200));
        assert_eq!(ids[1], Some(100));
        assert_eq!(ids[2], None);

        let claimed: Vec<_> = ids.iter().flatten().collect();
        let unique: HashSet<_> = claimed.iter().collect();
        assert_eq!(claimed.len(), unique.len());
    }

    #[test]
    fn test_override_wins() {
        let mut overrides = HashMap::new();
        overrides.insert(42, 999);
        let resolver = PlayerResolver::new(ResolverConfig { overrides, ..Default::default() });

        let result = resolver.resolve_one(
            &entry(42, "Shohei Ohtani", "LAD", "DH"),
            &[candidate(1, "Shohei Ohtani", "LAD", "DH"), candidate(999, "Shohei Ohtani", "LAD", "P")],
        );

        assert_eq!(result.stats_player_id(), Some(999));
        assert_eq!(result.reason, REASON_OVERRIDE);
        assert!(close(result.confidence, 1.0));
    }

    #[test]
    fn test_results_are_deterministic_and_bounded() {
        let resolver = PlayerResolver::default();
        let entries = vec![
            entry(1, "Bobby Witt Jr.", "KC", "SS"),
            entry(2, "Zack Wheeler", "PHI", "SP"),
            entry(3, "Aaron Judge", "NYY", "OF"),
            entry(4, "Nobody Here", "SEA", "C"),
        ];
        let candidates = vec![
            candidate(1, "Bobby Witt", "KCR", "SS"),
            candidate(2, "Zach Wheeler", "PHI", "P"),
            candidate(3, "Aaron Judge", "NYY", "RF"),
            candidate(4, "Aaron Nola", "PHI", "P"),
        ];

        let first = resolver.resolve(&entries, &candidates);
        let second = resolver.resolve(&entries, &candidates);
        assert_eq!(first, second);

        for m in &first {
            assert!((0.0..=1.0).contains(&m.confidence));
        }
        assert_eq!(first[0].stats_player_id(), Some(1));
        assert_eq!(first[1].stats_player_id(), Some(2));
        assert_eq!(first[2].stats_player_id(), Some(3));
        assert_eq!(first[3].stats_player_id(), None);
    }

    #[test]
    fn test_config_from_json() {
        let config: ResolverConfig =
            serde_json::from_str(r#"{"overrides": {"42": 999}, "extra_team_aliases": {"LV": "ATH"}}"#)
                .unwrap();
        assert_eq!(config.overrides.get(&42), Some(&999));
        let resolver = PlayerResolver::new(config);
        assert_eq!(resolver.normalize_team("lv"), "ATH");
    }
}
