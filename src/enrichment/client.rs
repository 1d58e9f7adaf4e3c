// src/enrichment/client.rs - Finds and verifies the official website of one company

use log::debug;

use crate::enrichment::fetch::{fetch_homepage, PageFetcher};
use crate::enrichment::scoring::token_set_ratio;
use crate::enrichment::search::{SearchError, SearchProvider};
use crate::models::EnrichmentRecord;
use crate::utils::config::EnrichmentConfig;
use crate::utils::constants::{FETCH_STATUS_NOT_FETCHED, SEARCH_QUERY_SUFFIX};

pub struct EnrichmentClient<S, F> {
    search: S,
    fetcher: F,
    config: EnrichmentConfig,
}

impl<S: SearchProvider, F: PageFetcher> EnrichmentClient<S, F> {
    pub fn new(search: S, fetcher: F, config: EnrichmentConfig) -> Self {
        Self {
            search,
            fetcher,
            config,
        }
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    fn is_skipped(&self, url: &str) -> bool {
        self.config
            .skip_domains
            .iter()
            .any(|domain| url.contains(domain.as_str()))
    }

    /// Searches for `<name> official site`, fetches every non-blocklisted
    /// result and keeps the one whose title, page text and snippet best match
    /// the name. Only a failed search is an error; fetch problems are recorded
    /// in `fetch_status`.
    pub async fn enrich(&self, name: &str) -> Result<EnrichmentRecord, SearchError> {
        let query = format!("{}{}", name, SEARCH_QUERY_SUFFIX);
        let hits = self.search.search(&query, self.config.search_results).await?;
        let name_lower = name.to_lowercase();

        let mut best_site = String::new();
        let mut best_score = 0.0_f64;
        let mut best_status: Option<String> = None;
        let mut last_status: Option<String> = None;

        for hit in hits.into_iter().take(self.config.search_results) {
            if self.is_skipped(&hit.url) {
                debug!("Skipping blocklisted result {}", hit.url);
                continue;
            }

            let page = fetch_homepage(&self.fetcher, &hit.url, &self.config.fetch).await;
            let haystack = format!("{} {} {}", hit.title, page.text, hit.snippet).to_lowercase();
            let score = token_set_ratio(&name_lower, &haystack);
            debug!("{} -> {} scored {} ({})", name, hit.url, score, page.status);

            if score > best_score {
                best_score = score;
                best_site = hit.url;
                best_status = Some(page.status.clone());
            }
            last_status = Some(page.status);
        }

        let fetch_status = best_status
            .or(last_status)
            .unwrap_or_else(|| FETCH_STATUS_NOT_FETCHED.to_string());

        Ok(EnrichmentRecord {
            representative: name.to_string(),
            website: best_site,
            verified: best_score >= self.config.confidence_threshold,
            confidence_score: best_score,
            fetch_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::fetch::{FetchError, PageResponse};
    use crate::enrichment::search::SearchHit;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    struct FakeSearch {
        hits: Vec<SearchHit>,
        queries: Mutex<Vec<String>>,
    }

    impl FakeSearch {
        fn new(hits: Vec<SearchHit>) -> Self {
            Self {
                hits,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    impl SearchProvider for FakeSearch {
        async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.hits.iter().take(max_results).cloned().collect())
        }
    }

    struct FailingSearch;

    impl SearchProvider for FailingSearch {
        async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
            Err(SearchError::Http("rate limited".into()))
        }
    }

    /// Serves canned pages; unknown URLs time out.
    struct FakeFetcher {
        pages: HashMap<String, PageResponse>,
        requested: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        fn new(pages: &[(&str, u16, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, status, body)| {
                        (
                            url.to_string(),
                            PageResponse {
                                status: *status,
                                body: body.to_string(),
                            },
                        )
                    })
                    .collect(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl PageFetcher for FakeFetcher {
        async fn get(&self, url: &str) -> Result<PageResponse, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Transient("timed out".into()))
        }
    }

    fn test_config() -> EnrichmentConfig {
        let mut config = EnrichmentConfig::default();
        config.fetch.backoff_unit = Duration::ZERO;
        config
    }

    #[tokio::test]
    async fn test_official_site_verified() {
        let search = FakeSearch::new(vec![SearchHit::new(
            "https://example.com",
            "Example Industries — Home",
            "Example Industries makes examples.",
        )]);
        let fetcher = FakeFetcher::new(&[(
            "https://example.com",
            200,
            "<html><head><title>Example Industries</title></head><body><h1>Welcome</h1></body></html>",
        )]);
        let client = EnrichmentClient::new(search, fetcher, test_config());

        let record = client.enrich("Example Industries").await.unwrap();
        assert_eq!(record.representative, "Example Industries");
        assert_eq!(record.website, "https://example.com");
        assert!(record.confidence_score > 70.0);
        assert!(record.verified);
        assert_eq!(record.fetch_status, "ok");
        assert_eq!(
            client.search.queries.lock().unwrap().as_slice(),
            ["Example Industries official site"]
        );
    }

    #[tokio::test]
    async fn test_all_results_on_skip_domains() {
        let search = FakeSearch::new(vec![
            SearchHit::new("https://www.linkedin.com/company/acme", "Acme | LinkedIn", "Acme"),
            SearchHit::new("https://en.wikipedia.org/wiki/Acme", "Acme - Wikipedia", "Acme"),
        ]);
        let client = EnrichmentClient::new(search, FakeFetcher::new(&[]), test_config());

        let record = client.enrich("acme").await.unwrap();
        assert_eq!(record.website, "");
        assert_eq!(record.confidence_score, 0.0);
        assert!(!record.verified);
        assert_eq!(record.fetch_status, "not_fetched");
        assert!(client.fetcher.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_best_candidate_wins_and_ties_keep_first() {
        let search = FakeSearch::new(vec![
            SearchHit::new("https://acme-one.com", "Acme Rockets", ""),
            SearchHit::new("https://acme-two.com", "Acme Rockets", ""),
            SearchHit::new("https://unrelated.com", "Something else", ""),
        ]);
        let fetcher = FakeFetcher::new(&[
            ("https://acme-one.com", 200, "<title>Acme Rockets</title>"),
            ("https://acme-two.com", 200, "<title>Acme Rockets</title>"),
            ("https://unrelated.com", 503, ""),
        ]);
        let client = EnrichmentClient::new(search, fetcher, test_config());

        let record = client.enrich("acme rockets").await.unwrap();
        assert_eq!(record.website, "https://acme-one.com");
        assert_eq!(record.confidence_score, 100.0);
        assert_eq!(record.fetch_status, "ok");
    }

    #[tokio::test]
    async fn test_failed_fetch_still_scores_title_and_snippet() {
        let search = FakeSearch::new(vec![SearchHit::new(
            "https://acme.com",
            "Acme Widgets Official",
            "acme widgets",
        )]);
        let client = EnrichmentClient::new(search, FakeFetcher::new(&[]), test_config());

        let record = client.enrich("Acme Widgets").await.unwrap();
        assert_eq!(record.fetch_status, "failed");
        assert_eq!(record.website, "https://acme.com");
        assert!(record.verified);
        // Two attempts for the transient error.
        assert_eq!(client.fetcher.requested.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unmatched_results_leave_website_empty() {
        let search = FakeSearch::new(vec![SearchHit::new("https://zzz.io", "qqq", "")]);
        let fetcher = FakeFetcher::new(&[("https://zzz.io", 404, "")]);
        let mut config = test_config();
        config.confidence_threshold = 0.0;
        let client = EnrichmentClient::new(search, fetcher, config);

        let record = client.enrich("acme").await.unwrap();
        assert_eq!(record.website, "");
        assert_eq!(record.confidence_score, 0.0);
        assert_eq!(record.fetch_status, "http_404");
        // verified iff score >= threshold
        assert!(record.verified);
    }

    #[tokio::test]
    async fn test_search_failure_is_an_error() {
        let client = EnrichmentClient::new(FailingSearch, FakeFetcher::new(&[]), test_config());
        assert!(client.enrich("acme").await.is_err());
    }
}
