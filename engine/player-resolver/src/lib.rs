//! Player Resolver - links fantasy roster entries to statistics provider players
//!
//! Names are normalized (diacritics, punctuation, case) and team codes are
//! mapped through an alias table before comparison. An exact-name stage runs
//! first; a fuzzy stage based on token and Jaro-Winkler similarity only runs
//! when the exact stage is not confident enough.

pub mod normalize;
pub mod positions;
pub mod resolver;
pub mod similarity;

pub use normalize::{normalize_name, TeamAliases};
pub use positions::{position_fit, PositionFit};
pub use resolver::{
    PlayerMatch, PlayerResolver, ResolverConfig, DISPLAY_SAFE_CONFIDENCE, FUZZY_FLOOR,
    WEEKLY_SAFE_CONFIDENCE,
};
pub use similarity::name_similarity;
