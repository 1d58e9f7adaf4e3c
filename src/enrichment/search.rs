//! Web search backends used to find candidate homepages.
//!
//! [`SearchProvider`] is the seam between the enrichment client and the
//! network. [`DuckDuckGoSearch`] scrapes the HTML-only DuckDuckGo endpoint;
//! tests substitute deterministic fakes.

use log::{debug, trace};
use scraper::{Html, Selector};
use std::future::Future;
use url::Url;

use crate::enrichment::http::{build_client, user_agent_for};
use crate::utils::config::FetchConfig;

const DUCKDUCKGO_HTML_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// One organic search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

impl SearchHit {
    pub fn new(url: impl Into<String>, title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            snippet: snippet.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The search request could not be sent or returned an error status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The result page could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

/// A web search backend.
pub trait SearchProvider: Send + Sync {
    /// Returns at most `max_results` organic results for `query`, best first.
    fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> impl Future<Output = Result<Vec<SearchHit>, SearchError>> + Send;
}

/// DuckDuckGo HTML endpoint scraper.
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    config: FetchConfig,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new(config: &FetchConfig) -> Result<Self, SearchError> {
        Self::with_endpoint(config, DUCKDUCKGO_HTML_ENDPOINT)
    }

    pub fn with_endpoint(config: &FetchConfig, endpoint: &str) -> Result<Self, SearchError> {
        let client = build_client(config)
            .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
            endpoint: endpoint.to_string(),
        })
    }
}

impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        trace!("DuckDuckGo search: {}", query);

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("q", query)])
            .header(reqwest::header::USER_AGENT, user_agent_for(&self.config))
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("DuckDuckGo request failed: {e}")))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("DuckDuckGo HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("DuckDuckGo response read failed: {e}")))?;

        parse_duckduckgo_html(&html, max_results)
    }
}

/// Unwraps DuckDuckGo's `//duckduckgo.com/l/?uddg=<target>` redirect links.
fn extract_url(href: &str) -> Option<String> {
    let full_href = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    let parsed = Url::parse(&full_href).ok()?;

    if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())
    } else {
        Some(full_href)
    }
}

pub fn parse_duckduckgo_html(html: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )
    .map_err(|e| SearchError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse(".result__a")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let snippet_sel = Selector::parse(".result__snippet")
        .map_err(|e| SearchError::Parse(format!("invalid snippet selector: {e:?}")))?;

    let mut hits = Vec::new();
    if max_results == 0 {
        return Ok(hits);
    }

    for element in document.select(&result_sel) {
        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };
        let title = title_el.text().collect::<String>().trim().to_string();
        let Some(url) = title_el.value().attr("href").and_then(extract_url) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }
        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        hits.push(SearchHit { url, title, snippet });
        if hits.len() >= max_results {
            break;
        }
    }

    debug!("DuckDuckGo results parsed: {}", hits.len());
    Ok(hits)
}
