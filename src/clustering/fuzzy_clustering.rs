// src/clustering/fuzzy_clustering.rs - Sorted adjacent-chain clustering of heavy forms

use std::collections::{BTreeSet, HashMap};

/// Upper-bound similarity from shared character counts:
/// `2 * |multiset intersection| / (len_a + len_b)`. Two empty strings are identical.
pub fn quick_ratio(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a + len_b == 0 {
        return 1.0;
    }

    let mut available: HashMap<char, usize> = HashMap::new();
    for c in b.chars() {
        *available.entry(c).or_insert(0) += 1;
    }
    let mut matches = 0usize;
    for c in a.chars() {
        if let Some(count) = available.get_mut(&c) {
            if *count > 0 {
                *count -= 1;
                matches += 1;
            }
        }
    }

    2.0 * matches as f64 / (len_a + len_b) as f64
}

/// Groups of heavy forms plus the lookup from each heavy form to its group key.
#[derive(Debug, Clone, Default)]
pub struct FuzzyClusters {
    pub groups: Vec<Vec<String>>,
    key_of: HashMap<String, String>,
}

impl FuzzyClusters {
    /// Group key (first member in sorted order) for a heavy form.
    pub fn fuzzy_key(&self, heavy: &str) -> Option<&str> {
        self.key_of.get(heavy).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Sorts and deduplicates the heavy forms, then walks them in order. A value
/// joins the current group when it is at least `threshold` similar to the
/// member added just before it; otherwise it opens a new group. Because the
/// walk is in sorted order, that member is always the preceding value, so
/// chains can drift: the ends of one group need not resemble each other.
pub fn cluster_heavy_forms<'a, I>(heavy_forms: I, threshold: f64) -> FuzzyClusters
where
    I: IntoIterator<Item = &'a str>,
{
    let sorted: BTreeSet<&str> = heavy_forms.into_iter().collect();

    let mut groups: Vec<Vec<String>> = Vec::new();
    for value in sorted {
        let joins_current = groups
            .last()
            .and_then(|group| group.last())
            .map_or(false, |last| quick_ratio(last, value) >= threshold);
        match groups.last_mut() {
            Some(group) if joins_current => group.push(value.to_string()),
            _ => groups.push(vec![value.to_string()]),
        }
    }

    let key_of = groups
        .iter()
        .flat_map(|group| {
            let key = group[0].clone();
            group.iter().map(move |member| (member.clone(), key.clone()))
        })
        .collect();

    FuzzyClusters { groups, key_of }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_ratio() {
        assert_eq!(quick_ratio("", ""), 1.0);
        assert_eq!(quick_ratio("abc", ""), 0.0);
        assert_eq!(quick_ratio("abc", "abc"), 1.0);
        // Order does not matter, only character counts.
        assert_eq!(quick_ratio("abc", "cba"), 1.0);
        assert!((quick_ratio("acme", "acne") - 0.75).abs() < 1e-9);
        assert!((quick_ratio("aab", "abb") - 2.0 * 2.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_similar_neighbours_share_key() {
        let clusters = cluster_heavy_forms(
            ["zeta", "acme industriess", "acme", "acme industries"],
            0.9,
        );
        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters.fuzzy_key("acme industries"), Some("acme industries"));
        assert_eq!(clusters.fuzzy_key("acme industriess"), Some("acme industries"));
        // "acme" -> "acme industries" is below 0.9
        assert_eq!(clusters.fuzzy_key("acme"), Some("acme"));
        assert_eq!(clusters.fuzzy_key("zeta"), Some("zeta"));
        assert_eq!(clusters.fuzzy_key("unknown"), None);
    }

    #[test]
    fn test_duplicates_and_order_are_irrelevant() {
        let a = cluster_heavy_forms(["b", "a", "b", "c"], 0.9);
        let b = cluster_heavy_forms(["c", "b", "a"], 0.9);
        assert_eq!(a.groups, b.groups);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn test_chain_drift_is_kept() {
        // Each neighbour pair differs by one character, the ends by two.
        let forms = ["abcdefghij", "abcdefghik", "abcdefghkl"];
        assert!(quick_ratio(forms[0], forms[2]) < 0.9);
        let clusters = cluster_heavy_forms(forms, 0.9);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters.fuzzy_key("abcdefghkl"), Some("abcdefghij"));
    }

    #[test]
    fn test_cluster_count_monotone_in_threshold() {
        let forms = [
            "acme", "acme trading", "acmee", "acne", "beta", "beta group", "betas",
            "delta", "delta co", "gamma", "gamma holdings", "gammaa",
        ];
        let mut previous = 0;
        for threshold in [0.0, 0.3, 0.5, 0.7, 0.8, 0.9, 0.95, 1.0, 1.01] {
            let count = cluster_heavy_forms(forms, threshold).len();
            assert!(count >= previous, "threshold {} gave {} < {}", threshold, count, previous);
            previous = count;
        }
        assert_eq!(cluster_heavy_forms(forms, 0.0).len(), 1);
        assert_eq!(cluster_heavy_forms(forms, 1.01).len(), forms.len());
    }

    #[test]
    fn test_empty_input() {
        let clusters = cluster_heavy_forms(std::iter::empty(), 0.9);
        assert!(clusters.is_empty());
    }
}
