//! DuckDuckGo Lite search engine implementation

use super::page_text::PageText;
use super::traits::*;
use crate::config::EngineConfig;
use crate::network::{accept_html, HttpClient};
use crate::search::{SearchError, SearchPage, SearchRequest, SearchResult, SearchResults};
use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Result-listing endpoint
pub const DDG_LITE_URL: &str = "https://lite.duckduckgo.com/lite/";

/// Origin the endpoint expects; any other value yields a different layout
pub const DDG_LITE_ORIGIN: &str = "https://lite.duckduckgo.com";

/// Longest query the endpoint accepts, in characters
pub const DDG_QUERY_LIMIT: usize = 495;

static ZERO_CLICK_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"table:nth-of-type(2) tr td a[rel="nofollow"]"#).unwrap());
static ZERO_CLICK_CONTENTS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table:nth-of-type(2) tr:nth-of-type(2)").unwrap());
static WEB_LINKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table:nth-of-type(3) .result-link").unwrap());
static WEB_SNIPPETS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table:nth-of-type(3) .result-snippet").unwrap());

/// DuckDuckGo Lite result-page scraper
///
/// When the endpoint answers with an instant-answer page instead of a
/// listing (the final URL is the bare endpoint), extraction is handed to
/// [`PageText`].
pub struct DuckDuckGoLite {
    client: HttpClient,
    page_text: PageText,
    endpoint: String,
    origin: String,
    query_limit: usize,
    timeout: Duration,
}

impl DuckDuckGoLite {
    pub fn new(client: HttpClient) -> Self {
        let timeout = client.default_timeout();
        Self {
            page_text: PageText::new(client.clone()),
            client,
            endpoint: DDG_LITE_URL.to_string(),
            origin: DDG_LITE_ORIGIN.to_string(),
            query_limit: DDG_QUERY_LIMIT,
            timeout,
        }
    }

    /// Point the engine at a different endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the Origin header sent upstream
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Form body for a request
    fn form_data(&self, request: &SearchRequest) -> HashMap<String, String> {
        let query: String = request.query.chars().take(self.query_limit).collect();

        let mut form_data = HashMap::new();
        form_data.insert("q".to_string(), query);
        form_data.insert(
            "df".to_string(),
            request.timerange.clone().unwrap_or_default(),
        );
        form_data.insert("kl".to_string(), request.region.clone().unwrap_or_default());
        form_data
    }

    /// Whether the endpoint redirected to an instant-answer page
    fn is_bang_page(&self, page: &SearchPage) -> bool {
        page.url == self.endpoint
    }

    fn parse_listing(&self, html: &str) -> Vec<SearchResult> {
        let document = Html::parse_document(html);
        let mut results = Vec::new();

        // Zero-click answer
        if let Some(link) = document.select(&ZERO_CLICK_LINK).next() {
            let body = document
                .select(&ZERO_CLICK_CONTENTS)
                .next()
                .map(|row| row.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            results.push(link_result(link, body));
        }

        // Web results, paired by position
        let links: Vec<ElementRef> = document.select(&WEB_LINKS).collect();
        let snippets: Vec<ElementRef> = document.select(&WEB_SNIPPETS).collect();

        if links.len() != snippets.len() {
            warn!(
                "Result listing has {} links but {} snippets",
                links.len(),
                snippets.len()
            );
        }

        for (i, link) in links.into_iter().enumerate() {
            let body = snippets
                .get(i)
                .map(|s| s.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            results.push(link_result(link, body));
        }

        results
    }
}

fn link_result(link: ElementRef<'_>, body: String) -> SearchResult {
    SearchResult {
        title: link.text().collect(),
        body,
        url: link.value().attr("href").unwrap_or_default().to_string(),
    }
}

#[async_trait]
impl SearchEngine for DuckDuckGoLite {
    fn name(&self) -> &str {
        "duckduckgo_lite"
    }

    async fn fetch(&self, request: &SearchRequest) -> Result<SearchPage, SearchError> {
        let engine_request = EngineRequest::post(&self.endpoint)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Accept", accept_html())
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Origin", &self.origin)
            .form(self.form_data(request));

        let response = self
            .client
            .execute_with_timeout(engine_request, self.timeout)
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?
            .error_for_status()?;

        debug!("Result page fetched from {}", response.url);
        Ok(response.into())
    }

    fn extract(&self, request: &SearchRequest, page: SearchPage) -> SearchResults {
        if self.is_bang_page(&page) {
            debug!("Instant-answer page, extracting page text instead");
            return self.page_text.extract(request, page);
        }

        let mut results = SearchResults::from(self.parse_listing(&page.html));
        if let Some(limit) = request.num_results {
            results.truncate(limit);
        }
        results
    }

    fn init(&mut self, config: &EngineConfig) -> anyhow::Result<()> {
        if let Some(timeout) = config.timeout_duration()? {
            self.timeout = timeout;
            self.page_text = self.page_text.clone().with_timeout(timeout);
        }
        if let Some(endpoint) = config.extra_str("endpoint") {
            url::Url::parse(endpoint)
                .with_context(|| format!("invalid endpoint for {}: {}", config.name, endpoint))?;
            self.endpoint = endpoint.to_string();
        }
        if let Some(origin) = config.extra_str("origin") {
            self.origin = origin.to_string();
        }
        if let Some(limit) = config.extra.get("query_limit").and_then(|v| v.as_u64()) {
            self.query_limit = limit as usize;
        }
        Ok(())
    }
}
