// src/models/records.rs - Row types flowing through both pipeline stages

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One input row. `raw_name` is `None` when the cell was missing entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub raw_name: Option<String>,
}

impl RawRecord {
    pub fn new(raw_name: impl Into<String>) -> Self {
        Self {
            raw_name: Some(raw_name.into()),
        }
    }

    pub fn missing() -> Self {
        Self { raw_name: None }
    }
}

/// Output of the canonicalizer for a single raw row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub raw_name: String,
    pub normalized_light: String,
    pub normalized_heavy: String,
}

/// One elected representative per fuzzy cluster. Also the row shape of the
/// batch artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representative {
    #[serde(rename = "fuzzy_heavy")]
    pub fuzzy_key: String,
    pub representative_name: String,
    pub potential_industry_keywords: String,
    pub search_query_website: String,
    pub search_query_industry: String,
}

/// Full row of the normalized artifact (`minimal_normalized.csv`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub raw_name: String,
    pub normalized_light: String,
    pub normalized_heavy: String,
    pub fuzzy_heavy: String,
    pub representative_name: String,
    pub potential_industry_keywords: String,
    pub search_query_website: String,
    pub search_query_industry: String,
}

impl NormalizedRow {
    pub fn representative(&self) -> Representative {
        Representative {
            fuzzy_key: self.fuzzy_heavy.clone(),
            representative_name: self.representative_name.clone(),
            potential_industry_keywords: self.potential_industry_keywords.clone(),
            search_query_website: self.search_query_website.clone(),
            search_query_industry: self.search_query_industry.clone(),
        }
    }
}

/// Result of verifying one representative against the web.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    pub representative: String,
    pub website: String,
    #[serde(serialize_with = "serialize_yes_no", deserialize_with = "deserialize_yes_no")]
    pub verified: bool,
    pub confidence_score: f64,
    pub fetch_status: String,
}

fn serialize_yes_no<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "Yes" } else { "No" })
}

fn deserialize_yes_no<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "yes" | "true" | "1"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verified_written_as_label() {
        let record = EnrichmentRecord {
            representative: "acme".to_string(),
            website: "https://acme.com".to_string(),
            verified: true,
            confidence_score: 100.0,
            fetch_status: "ok".to_string(),
        };
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&record).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert!(text.starts_with("representative,website,verified,confidence_score,fetch_status"));
        assert!(text.contains(",Yes,"));
    }

    #[test]
    fn test_verified_label_parsed_leniently() {
        let data = "representative,website,verified,confidence_score,fetch_status\n\
                    a,,No,0,not_fetched\n\
                    b,https://b.com,yes,88.5,ok\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<EnrichmentRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert!(!rows[0].verified);
        assert!(rows[1].verified);
        assert_eq!(rows[1].confidence_score, 88.5);
    }

    #[test]
    fn test_representative_uses_fuzzy_heavy_column() {
        let rep = Representative {
            fuzzy_key: "acme".to_string(),
            representative_name: "acme corp".to_string(),
            potential_industry_keywords: "acme".to_string(),
            search_query_website: "acme corp official website".to_string(),
            search_query_industry: "acme corp industry".to_string(),
        };
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&rep).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert!(text.starts_with(
            "fuzzy_heavy,representative_name,potential_industry_keywords,search_query_website,search_query_industry"
        ));
    }
}
