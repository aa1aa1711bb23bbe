//! Name and team-code normalization applied before any comparison

use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical club codes
pub const CANONICAL_TEAMS: [&str; 30] = [
    "ARI", "ATH", "ATL", "BAL", "BOS", "CHC", "CHW", "CIN", "CLE", "COL", "DET", "HOU", "KC",
    "LAA", "LAD", "MIA", "MIL", "MIN", "NYM", "NYY", "PHI", "PIT", "SD", "SEA", "SF", "STL",
    "TB", "TEX", "TOR", "WSH",
];

/// Alternate abbreviations seen across platforms and historical feeds
const DEFAULT_TEAM_ALIASES: [(&str, &str); 26] = [
    ("AZ", "ARI"),
    ("OAK", "ATH"),
    ("CWS", "CHW"),
    ("CHA", "CHW"),
    ("CHN", "CHC"),
    ("KCR", "KC"),
    ("KCA", "KC"),
    ("ANA", "LAA"),
    ("CAL", "LAA"),
    ("LAN", "LAD"),
    ("FLA", "MIA"),
    ("NYA", "NYY"),
    ("NYN", "NYM"),
    ("SDP", "SD"),
    ("SDN", "SD"),
    ("SFG", "SF"),
    ("SFN", "SF"),
    ("SLN", "STL"),
    ("TBR", "TB"),
    ("TBA", "TB"),
    ("TBD", "TB"),
    ("WSN", "WSH"),
    ("WAS", "WSH"),
    ("WSX", "CHW"),
    ("CLG", "CLE"),
    ("MLW", "MIL"),
];

/// Codes that mean "no club"
const UNAFFILIATED: [&str; 3] = ["FA", "--", "NONE"];

/// Lower-case, strip diacritics, drop non-letters, collapse whitespace
pub fn normalize_name(name: &str) -> String {
    let mut folded = String::with_capacity(name.len());
    for c in name.nfd().filter(|c| !is_combining_mark(*c)) {
        match c {
            'ø' | 'Ø' => folded.push('o'),
            'ł' | 'Ł' => folded.push('l'),
            'đ' | 'Đ' => folded.push('d'),
            'ß' => folded.push_str("ss"),
            'æ' | 'Æ' => folded.push_str("ae"),
            c if c.is_whitespace() => folded.push(' '),
            c if c.is_alphabetic() => folded.extend(c.to_lowercase()),
            _ => {}
        }
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Alias table mapping alternate club abbreviations to one canonical code
#[derive(Debug, Clone)]
pub struct TeamAliases {
    aliases: HashMap<String, String>,
}

impl TeamAliases {
    /// Built-in aliases plus any extra `alias -> canonical` pairs
    pub fn new(extra: &HashMap<String, String>) -> Self {
        let mut aliases: HashMap<String, String> = DEFAULT_TEAM_ALIASES
            .iter()
            .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
            .collect();
        for (alias, canonical) in extra {
            aliases.insert(alias.trim().to_ascii_uppercase(), canonical.trim().to_ascii_uppercase());
        }
        Self { aliases }
    }

    /// Canonical code, or the upper-cased input when no alias applies
    pub fn normalize(&self, code: &str) -> String {
        let upper = code.trim().to_ascii_uppercase();
        self.aliases.get(&upper).cloned().unwrap_or(upper)
    }
}

impl Default for TeamAliases {
    fn default() -> Self {
        Self::new(&HashMap::new())
    }
}

/// A normalized code that names an actual club
pub fn is_known_team(normalized: &str) -> bool {
    !normalized.is_empty() && !UNAFFILIATED.contains(&normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("José Ramírez"), "jose ramirez");
        assert_eq!(normalize_name("  Ronald  Acuña Jr. "), "ronald acuna jr");
        assert_eq!(normalize_name("J.D. Martinez"), "jd martinez");
        assert_eq!(normalize_name("Travis d'Arnaud"), "travis darnaud");
        assert_eq!(normalize_name("Isiah Kiner-Falefa"), "isiah kinerfalefa");
        assert_eq!(normalize_name("Jonas Øster"), "jonas oster");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_team_aliases() {
        let teams = TeamAliases::default();
        assert_eq!(teams.normalize("cws"), "CHW");
        assert_eq!(teams.normalize("CHW"), "CHW");
        assert_eq!(teams.normalize(" SFG "), "SF");
        assert_eq!(teams.normalize("OAK"), "ATH");
        assert_eq!(teams.normalize("WSN"), "WSH");
        assert_eq!(teams.normalize("SEA"), "SEA");
    }

    #[test]
    fn test_every_alias_targets_a_canonical_code() {
        for (_, canonical) in DEFAULT_TEAM_ALIASES {
            assert!(CANONICAL_TEAMS.contains(&canonical), "{canonical} is not canonical");
        }
    }

    #[test]
    fn test_extra_aliases() {
        let mut extra = HashMap::new();
        extra.insert("lv".to_string(), "ath".to_string());
        let teams = TeamAliases::new(&extra);
        assert_eq!(teams.normalize("LV"), "ATH");
    }

    #[test]
    fn test_known_team() {
        assert!(is_known_team("SEA"));
        assert!(!is_known_team(""));
        assert!(!is_known_team("FA"));
    }
}
