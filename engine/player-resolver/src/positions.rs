//! Position compatibility between platform position codes and provider codes
//!
//! The relation is many-to-many: a platform "OF" accepts LF/CF/RF, a provider
//! "DH" or two-way "TWP" fits any hitter, and so on.

/// How a roster position relates to a provider position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFit {
    Compatible,
    Incompatible,
    /// One side is missing or not in the table
    Unknown,
}

const OUTFIELD: &[&str] = &["OF", "LF", "CF", "RF"];
const PITCHERS: &[&str] = &["P", "SP", "RP"];
const HITTERS: &[&str] =
    &["C", "1B", "2B", "3B", "SS", "OF", "LF", "CF", "RF", "DH", "UTIL", "IF", "MI", "CI"];

/// Provider codes accepted for a platform position
fn accepted_codes(roster_position: &str) -> Option<&'static [&'static str]> {
    let codes: &'static [&'static str] = match roster_position {
        "C" => &["C"],
        "1B" => &["1B"],
        "2B" => &["2B"],
        "3B" => &["3B"],
        "SS" => &["SS"],
        "OF" | "LF" | "CF" | "RF" => OUTFIELD,
        "DH" => &["DH"],
        "IF" => &["1B", "2B", "3B", "SS"],
        "MI" => &["2B", "SS"],
        "CI" => &["1B", "3B"],
        "UTIL" => HITTERS,
        "SP" => &["P", "SP"],
        "RP" => &["P", "RP"],
        "P" => PITCHERS,
        _ => return None,
    };
    Some(codes)
}

fn is_hitter(code: &str) -> bool {
    HITTERS.contains(&code)
}

/// Compare a platform position with a provider position
pub fn position_fit(roster_position: &str, stats_position: &str) -> PositionFit {
    let roster = roster_position.trim().to_ascii_uppercase();
    let stats = stats_position.trim().to_ascii_uppercase();

    if roster.is_empty() || stats.is_empty() {
        return PositionFit::Unknown;
    }
    if roster == stats || roster == "TWP" || stats == "TWP" {
        return PositionFit::Compatible;
    }
    if matches!(stats.as_str(), "DH" | "PH" | "PR") && is_hitter(&roster) {
        return PositionFit::Compatible;
    }

    match accepted_codes(&roster) {
        Some(codes) if codes.contains(&stats.as_str()) => PositionFit::Compatible,
        Some(_) => PositionFit::Incompatible,
        None => PositionFit::Unknown,
    }
}
