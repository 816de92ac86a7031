//! Google Custom Search JSON API: structured results, quota-limited.
//!
//! Needs both an API key and a search engine ID (`cx`). The free tier allows
//! 100 queries per day and at most 10 results per request.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::backend::SearchBackend;
use crate::config::{usable_credential, GoogleCseConfig};
use crate::error::SearchError;
use crate::http;
use crate::types::{SearchProvider, SearchResult};

/// Largest `num` the API accepts.
const MAX_PAGE_SIZE: usize = 10;

/// Google Custom Search backend. Priority 2 in the default chain.
pub struct GoogleCseBackend {
    config: GoogleCseConfig,
    client: reqwest::Client,
}

impl GoogleCseBackend {
    pub fn new(config: GoogleCseConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        let key = usable_credential(self.config.api_key.as_deref())?;
        let cx = usable_credential(self.config.cx.as_deref())?;
        Some((key, cx))
    }
}

#[async_trait]
impl SearchBackend for GoogleCseBackend {
    fn provider(&self) -> SearchProvider {
        SearchProvider::GoogleCse
    }

    fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        let Some((api_key, cx)) = self.credentials() else {
            return Err(SearchError::MissingCredentials(
                "Google CSE key or engine ID not configured".into(),
            ));
        };
        tracing::trace!(query, limit, "Google CSE search");

        let num = limit.clamp(1, MAX_PAGE_SIZE).to_string();
        let request = self.client.get(&self.config.base_url).query(&[
            ("key", api_key),
            ("cx", cx),
            ("q", query),
            ("num", num.as_str()),
        ]);

        let response = http::send_checked(
            request,
            Duration::from_secs(self.config.timeout_seconds),
            "Google CSE",
        )
        .await?;
        let body = http::read_text(response, "Google CSE").await?;

        parse_google_cse_json(&body)
    }
}

#[derive(Deserialize)]
struct CseResponse {
    // Absent when the query has no hits.
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Deserialize)]
struct CseItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

/// Parse a Custom Search JSON response into search results.
pub(crate) fn parse_google_cse_json(body: &str) -> Result<Vec<SearchResult>, SearchError> {
    let parsed: CseResponse = serde_json::from_str(body).map_err(|e| {
        SearchError::MalformedResponse(format!("Google CSE payload is not valid: {e}"))
    })?;

    Ok(parsed
        .items
        .into_iter()
        .filter_map(|item| {
            let url = item.link.filter(|l| !l.trim().is_empty())?;
            Some(SearchResult {
                title: item.title.unwrap_or_default(),
                url,
                snippet: item.snippet.unwrap_or_default(),
                provider: SearchProvider::GoogleCse,
            })
        })
        .collect())
}
