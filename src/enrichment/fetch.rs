// src/enrichment/fetch.rs - Homepage retrieval with retry and text extraction

use log::{debug, warn};
use scraper::{Html, Selector};
use std::future::Future;

use crate::enrichment::http::{build_client, user_agent_for};
use crate::utils::config::FetchConfig;
use crate::utils::constants::{FETCH_STATUS_FAILED, FETCH_STATUS_OK};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Timeouts, refused connections, TLS failures. Worth retrying.
    #[error("transient fetch error: {0}")]
    Transient(String),

    /// Anything else (bad URL, undecodable body, ...). Not retried.
    #[error("unexpected fetch error: {0}")]
    Unexpected(String),
}

/// Raw HTTP response as seen by the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

/// Outcome of fetching one homepage: extracted text plus a status label
/// (`ok`, `http_<code>` or `failed`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFetch {
    pub text: String,
    pub status: String,
}

impl PageFetch {
    fn failed() -> Self {
        Self {
            text: String::new(),
            status: FETCH_STATUS_FAILED.to_string(),
        }
    }
}

/// Performs a single GET. Implementations classify their failures.
pub trait PageFetcher: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<PageResponse, FetchError>> + Send;
}

pub struct HttpPageFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpPageFetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let client = build_client(config)?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() || e.is_connect() || e.is_request() {
        FetchError::Transient(e.to_string())
    } else {
        FetchError::Unexpected(e.to_string())
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn get(&self, url: &str) -> Result<PageResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent_for(&self.config))
            .send()
            .await
            .map_err(classify)?;
        let status = response.status().as_u16();
        if status != 200 {
            return Ok(PageResponse {
                status,
                body: String::new(),
            });
        }
        let body = response.text().await.map_err(classify)?;
        Ok(PageResponse { status, body })
    }
}

/// Fetches `url` and extracts its text. Non-200 answers are final. Transient
/// errors are retried up to `max_attempts` in total, sleeping
/// `backoff_delay(attempt)` between attempts; unexpected errors end the fetch.
pub async fn fetch_homepage<F: PageFetcher>(fetcher: &F, url: &str, config: &FetchConfig) -> PageFetch {
    let attempts = config.max_attempts.max(1);
    for attempt in 0..attempts {
        match fetcher.get(url).await {
            Ok(response) if response.status == 200 => {
                return PageFetch {
                    text: extract_page_text(&response.body),
                    status: FETCH_STATUS_OK.to_string(),
                };
            }
            Ok(response) => {
                debug!("{} answered HTTP {}", url, response.status);
                return PageFetch {
                    text: String::new(),
                    status: format!("http_{}", response.status),
                };
            }
            Err(FetchError::Transient(msg)) => {
                warn!("[Attempt {}] Error fetching {}: {}", attempt + 1, url, msg);
                if attempt + 1 < attempts {
                    tokio::time::sleep(config.backoff_delay(attempt)).await;
                }
            }
            Err(FetchError::Unexpected(msg)) => {
                warn!("[Attempt {}] Unexpected error for {}: {}", attempt + 1, url, msg);
                break;
            }
        }
    }
    PageFetch::failed()
}

/// Title, every `<meta content>` value and every `<h1>` text, space-joined.
pub fn extract_page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let (Ok(title_sel), Ok(meta_sel), Ok(h1_sel)) = (
        Selector::parse("title"),
        Selector::parse("meta"),
        Selector::parse("h1"),
    ) else {
        return String::new();
    };

    let title = document
        .select(&title_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();
    let meta = document
        .select(&meta_sel)
        .filter_map(|el| el.value().attr("content"))
        .collect::<Vec<_>>()
        .join(" ");
    let headings = document
        .select(&h1_sel)
        .map(|el| el.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");

    [title, meta, headings]
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
