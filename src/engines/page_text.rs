//! Page text engine: fetches one page and extracts its readable content

use super::readability;
use super::traits::*;
use crate::config::EngineConfig;
use crate::network::HttpClient;
use crate::search::{SearchError, SearchPage, SearchRequest, SearchResult, SearchResults};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, warn};

/// Title of the single result returned when no content could be extracted
pub const PARSE_FAILURE_TITLE: &str = "Could not parse the page.";

/// Title of the single result returned when the page could not be fetched
pub const FETCH_FAILURE_TITLE: &str = "Could not fetch the page.";

static MANY_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());
static MANY_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r" {3,}").unwrap());
static NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+(\s*\n)*").unwrap());

/// Normalize whitespace in extracted page text
///
/// Idempotent: cleaning already-clean text returns it unchanged.
pub fn clean_text(text: &str) -> String {
    let text = text.trim().replace('\t', "");
    let text = MANY_NEWLINES.replace_all(&text, "\n\n\n");
    let text = MANY_SPACES.replace_all(&text, "  ");
    NEWLINE_RUNS.replace_all(&text, "\n").into_owned()
}

/// Interpret a query as a URL, defaulting to https
pub fn normalize_url(query: &str) -> String {
    let query = query.trim();
    if query.starts_with("http") {
        query.to_string()
    } else {
        format!("https://{}", query)
    }
}

/// General page extractor
///
/// Fetch failures never propagate: they become a page carrying the
/// failure status and an explanation, which `extract` turns into a result.
#[derive(Clone)]
pub struct PageText {
    client: HttpClient,
    timeout: Duration,
}

impl PageText {
    pub fn new(client: HttpClient) -> Self {
        let timeout = client.default_timeout();
        Self { client, timeout }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl SearchEngine for PageText {
    fn name(&self) -> &str {
        "page_text"
    }

    async fn fetch(&self, request: &SearchRequest) -> Result<SearchPage, SearchError> {
        let url = normalize_url(&request.query);
        debug!("Fetching page {}", url);

        let response = match self
            .client
            .execute_with_timeout(EngineRequest::get(&url), self.timeout)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Could not fetch {}: {}", url, e);
                return Ok(SearchPage::failed(
                    format!(
                        "Could not fetch the page: {}.\nMake sure the URL is correct.",
                        e
                    ),
                    url,
                ));
            }
        };

        if !response.is_success() {
            warn!("Fetching {} returned {}", url, response.status);
            return Ok(SearchPage::failed(
                format!(
                    "Could not fetch the page: {} {}",
                    response.status, response.reason
                ),
                url,
            ));
        }

        Ok(response.into())
    }

    fn extract(&self, _request: &SearchRequest, page: SearchPage) -> SearchResults {
        if page.is_failure() {
            return SearchResults::from(vec![SearchResult::new(
                FETCH_FAILURE_TITLE,
                page.html,
                page.url,
            )]);
        }

        let result = match readability::parse(&page.html) {
            Some(article) => {
                SearchResult::new(article.title, clean_text(&article.text_content), page.url)
            }
            None => {
                debug!("No readable content found at {}", page.url);
                SearchResult::new(PARSE_FAILURE_TITLE, "", page.url)
            }
        };

        SearchResults::from(vec![result])
    }

    fn init(&mut self, config: &EngineConfig) -> anyhow::Result<()> {
        if let Some(timeout) = config.timeout_duration()? {
            self.timeout = timeout;
        }
        Ok(())
    }
}
