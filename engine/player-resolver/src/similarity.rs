//! String similarity over normalized names

use strsim::{jaro_winkler, normalized_levenshtein};

/// Generational suffixes ignored by the token comparison
const SUFFIXES: [&str; 5] = ["jr", "sr", "ii", "iii", "iv"];

fn tokens(name: &str) -> Vec<&str> {
    name.split_whitespace().filter(|t| !SUFFIXES.contains(t)).collect()
}

fn token_pair_score(a: &str, b: &str) -> f64 {
    let score = normalized_levenshtein(a, b);
    // "j" against "jose"
    let initial = (a.len() == 1 && b.starts_with(a)) || (b.len() == 1 && a.starts_with(b));
    if initial {
        score.max(0.8)
    } else {
        score
    }
}

/// Average best per-token Levenshtein score, scaled down when token counts differ
pub fn token_similarity(a: &str, b: &str) -> f64 {
    let tokens_a = tokens(a);
    let tokens_b = tokens(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return normalized_levenshtein(a, b);
    }

    let (short, long) =
        if tokens_a.len() <= tokens_b.len() { (&tokens_a, &tokens_b) } else { (&tokens_b, &tokens_a) };

    let total: f64 = short
        .iter()
        .map(|t| long.iter().map(|u| token_pair_score(t, u)).fold(0.0, f64::max))
        .sum();
    let average = total / short.len() as f64;
    let coverage = (short.len() as f64 / long.len() as f64).sqrt();

    (average * coverage).max(normalized_levenshtein(&tokens_a.join(" "), &tokens_b.join(" ")))
}

/// Name similarity in [0, 1]: the better of the token score and Jaro-Winkler
pub fn name_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    token_similarity(a, b).max(jaro_winkler(a, b)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_names() {
        assert!((name_similarity("mike trout", "mike trout") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_suffix_ignored() {
        assert!((token_similarity("michael harris ii", "michael harris") - 1.0).abs() < 1e-9);
        assert!((token_similarity("vladimir guerrero jr", "vladimir guerrero") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_nickname_scores_above_unrelated() {
        let close = name_similarity("mike trout", "michael trout");
        let far = name_similarity("mike trout", "shohei ohtani");
        assert!(close > 0.8, "close = {close}");
        assert!(far < close);
    }

    #[test]
    fn test_single_token_is_discounted() {
        let partial = token_similarity("trout", "mike trout");
        assert!(partial < 0.8, "partial = {partial}");
    }

    #[test]
    fn test_bounds_and_empty() {
        assert_eq!(name_similarity("", "mike trout"), 0.0);
        let s = name_similarity("a", "zzzzzzzz");
        assert!((0.0..=1.0).contains(&s));
    }
}
