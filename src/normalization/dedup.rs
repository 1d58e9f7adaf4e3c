// src/normalization/dedup.rs

use std::collections::HashSet;

use crate::models::NormalizedRecord;

/// Drops records with a blank light form, then keeps the first record for
/// each distinct light form. Input order is preserved.
pub fn deduplicate(records: Vec<NormalizedRecord>) -> Vec<NormalizedRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    records
        .into_iter()
        .filter(|record| !record.normalized_light.trim().is_empty())
        .filter(|record| seen.insert(record.normalized_light.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(raw: &str, light: &str) -> NormalizedRecord {
        NormalizedRecord {
            raw_name: raw.to_string(),
            normalized_light: light.to_string(),
            normalized_heavy: light.to_string(),
        }
    }

    #[test]
    fn test_blank_and_repeated_light_forms_removed() {
        let out = deduplicate(vec![
            rec("Acme", "acme"),
            rec("", ""),
            rec("  ", "  "),
            rec("ACME", "acme"),
            rec("Beta", "beta"),
            rec("acme!", "acme"),
        ]);
        let raws: Vec<&str> = out.iter().map(|r| r.raw_name.as_str()).collect();
        assert_eq!(raws, vec!["Acme", "Beta"]);

        let lights: HashSet<&str> = out.iter().map(|r| r.normalized_light.as_str()).collect();
        assert_eq!(lights.len(), out.len());
    }
}
