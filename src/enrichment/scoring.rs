// src/enrichment/scoring.rs - Token-set similarity between a company name and page text

use std::collections::BTreeSet;

/// Longest common subsequence length over characters.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Insert/delete edit distance.
fn indel_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    a.len() + b.len() - 2 * lcs_len(&a, &b)
}

fn normalized_similarity(distance: usize, length_sum: usize) -> f64 {
    if length_sum == 0 {
        return 100.0;
    }
    100.0 - 100.0 * distance as f64 / length_sum as f64
}

/// Indel similarity of two strings on a 0-100 scale.
#[cfg(test)]
fn ratio(a: &str, b: &str) -> f64 {
    let length_sum = a.chars().count() + b.chars().count();
    normalized_similarity(indel_distance(a, b), length_sum)
}

/// Token-set similarity (0-100, two decimals). Both strings are split into
/// whitespace token sets; if one set contains the other the score is 100,
/// otherwise the best indel similarity among `intersection` vs
/// `intersection + rest_a`, `intersection` vs `intersection + rest_b`, and the
/// two extended strings against each other.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let diff_ab_joined = diff_ab.join(" ");
    let diff_ba_joined = diff_ba.join(" ");
    let ab_len = diff_ab_joined.chars().count();
    let ba_len = diff_ba_joined.chars().count();
    let sect_len = intersection.join(" ").chars().count();
    let separator = usize::from(sect_len != 0);

    let sect_ab_len = sect_len + separator + ab_len;
    let sect_ba_len = sect_len + separator + ba_len;

    // The shared prefix contributes nothing to the distance between the extended strings.
    let mut best = normalized_similarity(
        indel_distance(&diff_ab_joined, &diff_ba_joined),
        sect_ab_len + sect_ba_len,
    );

    if sect_len != 0 {
        let sect_ab = normalized_similarity(separator + ab_len, sect_len + sect_ab_len);
        let sect_ba = normalized_similarity(separator + ba_len, sect_len + sect_ba_len);
        best = best.max(sect_ab).max(sect_ba);
    }

    (best * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio() {
        assert_eq!(ratio("", ""), 100.0);
        assert_eq!(ratio("abc", "abc"), 100.0);
        assert_eq!(ratio("abc", ""), 0.0);
        assert_eq!(ratio("acme", "zeta"), 25.0);
    }

    #[test]
    fn test_subset_scores_full_marks() {
        assert_eq!(token_set_ratio("fuzzy was a bear", "fuzzy fuzzy was a bear"), 100.0);
        assert_eq!(
            token_set_ratio(
                "example industries",
                "example industries — home welcome to example industries"
            ),
            100.0
        );
    }

    #[test]
    fn test_partial_overlap() {
        assert_eq!(token_set_ratio("new york mets", "new york yankees"), 76.19);
        assert_eq!(token_set_ratio("new york mets", "yankees new york"), 76.19);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(token_set_ratio("", "anything"), 0.0);
        assert_eq!(token_set_ratio("acme", "   "), 0.0);
    }

    #[test]
    fn test_score_bounds() {
        let names = ["acme", "acme corp", "zeta holdings", "北京 acme", "a"];
        let texts = [
            "",
            "acme",
            "welcome to the acme corporation homepage",
            "totally unrelated words here",
            "zeta",
            "北京",
        ];
        for name in names {
            for text in texts {
                let score = token_set_ratio(name, text);
                assert!((0.0..=100.0).contains(&score), "{} vs {} -> {}", name, text, score);
            }
        }
    }
}
