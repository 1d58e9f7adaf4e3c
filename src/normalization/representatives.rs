// src/normalization/representatives.rs - Representative election and artifact rows

use std::collections::HashMap;

use crate::clustering::FuzzyClusters;
use crate::models::{NormalizedRecord, NormalizedRow};
use crate::utils::constants::{INDUSTRY_QUERY_SUFFIX, WEBSITE_QUERY_SUFFIX};

pub fn website_query(name: &str) -> String {
    format!("{}{}", name, WEBSITE_QUERY_SUFFIX)
}

pub fn industry_query(name: &str) -> String {
    format!("{}{}", name, INDUSTRY_QUERY_SUFFIX)
}

fn fuzzy_key_for<'a>(record: &'a NormalizedRecord, clusters: &'a FuzzyClusters) -> &'a str {
    clusters
        .fuzzy_key(&record.normalized_heavy)
        .unwrap_or(&record.normalized_heavy)
}

/// Counts light forms per cluster and elects the most frequent one.
/// Ties go to the light form seen first in `records`.
pub fn elect_representatives(
    records: &[NormalizedRecord],
    clusters: &FuzzyClusters,
) -> HashMap<String, String> {
    // (light form, count) in first-seen order, per fuzzy key
    let mut tallies: HashMap<&str, Vec<(&str, usize)>> = HashMap::new();
    for record in records {
        let tally = tallies.entry(fuzzy_key_for(record, clusters)).or_default();
        match tally
            .iter_mut()
            .find(|(light, _)| *light == record.normalized_light)
        {
            Some((_, count)) => *count += 1,
            None => tally.push((record.normalized_light.as_str(), 1)),
        }
    }

    tallies
        .into_iter()
        .filter_map(|(key, tally)| {
            let mut best: Option<(&str, usize)> = None;
            for (light, count) in tally {
                if best.map_or(true, |(_, best_count)| count > best_count) {
                    best = Some((light, count));
                }
            }
            best.map(|(light, _)| (key.to_string(), light.to_string()))
        })
        .collect()
}

/// One artifact row per record, in record order.
pub fn build_normalized_rows(
    records: &[NormalizedRecord],
    clusters: &FuzzyClusters,
) -> Vec<NormalizedRow> {
    let representatives = elect_representatives(records, clusters);
    records
        .iter()
        .map(|record| {
            let fuzzy_heavy = fuzzy_key_for(record, clusters).to_string();
            let representative_name = representatives
                .get(&fuzzy_heavy)
                .cloned()
                .unwrap_or_else(|| record.normalized_light.clone());
            NormalizedRow {
                raw_name: record.raw_name.clone(),
                normalized_light: record.normalized_light.clone(),
                normalized_heavy: record.normalized_heavy.clone(),
                potential_industry_keywords: record.normalized_heavy.clone(),
                search_query_website: website_query(&representative_name),
                search_query_industry: industry_query(&representative_name),
                fuzzy_heavy,
                representative_name,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::cluster_heavy_forms;

    fn rec(light: &str, heavy: &str) -> NormalizedRecord {
        NormalizedRecord {
            raw_name: light.to_uppercase(),
            normalized_light: light.to_string(),
            normalized_heavy: heavy.to_string(),
        }
    }

    #[test]
    fn test_most_frequent_light_form_wins() {
        let records = vec![
            rec("acme corp", "acme"),
            rec("acme ltd", "acme"),
            rec("acme ltd", "acme"),
            rec("zeta", "zeta"),
        ];
        let clusters = cluster_heavy_forms(records.iter().map(|r| r.normalized_heavy.as_str()), 0.9);
        let reps = elect_representatives(&records, &clusters);
        assert_eq!(reps.get("acme").map(String::as_str), Some("acme ltd"));
        assert_eq!(reps.get("zeta").map(String::as_str), Some("zeta"));
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let records = vec![rec("acme corp", "acme"), rec("acme corporation", "acme")];
        let clusters = cluster_heavy_forms(["acme"], 0.9);
        let reps = elect_representatives(&records, &clusters);
        assert_eq!(reps["acme"], "acme corp");
    }

    #[test]
    fn test_rows_carry_queries_and_own_keywords() {
        let records = vec![
            rec("acme industries", "acme industries"),
            rec("acme industriess", "acme industriess"),
        ];
        let clusters = cluster_heavy_forms(records.iter().map(|r| r.normalized_heavy.as_str()), 0.9);
        let rows = build_normalized_rows(&records, &clusters);

        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.fuzzy_heavy, "acme industries");
            assert_eq!(row.representative_name, "acme industries");
            assert_eq!(row.search_query_website, "acme industries official website");
            assert_eq!(row.search_query_industry, "acme industries industry");
        }
        assert_eq!(rows[1].potential_industry_keywords, "acme industriess");
        assert_eq!(rows[1].raw_name, "ACME INDUSTRIESS");
    }
}
