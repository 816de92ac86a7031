//! Jina AI search: semantic search returning clean page descriptions.
//!
//! Uses `GET https://s.jina.ai/{query}` with `Accept: application/json`,
//! which answers with a `data` array of `{title, url, description, content}`.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::backend::SearchBackend;
use crate::config::{usable_credential, JinaConfig};
use crate::error::SearchError;
use crate::http;
use crate::types::{SearchProvider, SearchResult};

/// Snippets longer than this are cut.
const SNIPPET_MAX_CHARS: usize = 300;

/// Jina AI search backend. Priority 1 in the default chain.
pub struct JinaBackend {
    config: JinaConfig,
    client: reqwest::Client,
}

impl JinaBackend {
    pub fn new(config: JinaConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl SearchBackend for JinaBackend {
    fn provider(&self) -> SearchProvider {
        SearchProvider::Jina
    }

    fn is_configured(&self) -> bool {
        usable_credential(self.config.api_key.as_deref()).is_some()
    }

    async fn search(&self, query: &str, _limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        let Some(api_key) = usable_credential(self.config.api_key.as_deref()) else {
            return Err(SearchError::MissingCredentials("Jina API key not configured".into()));
        };
        tracing::trace!(query, "Jina search");

        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        let request = self
            .client
            .get(format!("{}{encoded}", self.config.base_url))
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(api_key);

        let response = http::send_checked(
            request,
            Duration::from_secs(self.config.timeout_seconds),
            "Jina",
        )
        .await?;
        let body = http::read_text(response, "Jina").await?;

        tracing::trace!(bytes = body.len(), "Jina response received");
        parse_jina_json(&body)
    }
}

#[derive(Deserialize)]
struct JinaResponse {
    data: Option<Vec<JinaItem>>,
}

#[derive(Deserialize)]
struct JinaItem {
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
    content: Option<String>,
}

/// Parse a Jina JSON response into search results.
///
/// Items without a URL are skipped. The snippet prefers `description` and
/// falls back to `content`.
pub(crate) fn parse_jina_json(body: &str) -> Result<Vec<SearchResult>, SearchError> {
    let parsed: JinaResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::MalformedResponse(format!("Jina payload is not JSON: {e}")))?;
    let items = parsed
        .data
        .ok_or_else(|| SearchError::MalformedResponse("Jina payload has no `data` array".into()))?;

    let results = items
        .into_iter()
        .filter_map(|item| {
            let url = item.url.filter(|u| !u.trim().is_empty())?;
            let snippet = item.description.or(item.content).unwrap_or_default();
            Some(SearchResult {
                title: item.title.unwrap_or_else(|| "Untitled".to_owned()),
                url,
                snippet: snippet.chars().take(SNIPPET_MAX_CHARS).collect(),
                provider: SearchProvider::Jina,
            })
        })
        .collect();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_data_items() {
        let body = r#"{"code":200,"data":[
            {"title":"Market Trends 2024","url":"https://a.example/trends","description":"Overview of trends"},
            {"title":"Retail Outlook","url":"https://b.example/retail","content":"Full page body"}
        ]}"#;
        let results = parse_jina_json(body).expect("parse");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Market Trends 2024");
        assert_eq!(results[0].snippet, "Overview of trends");
        assert_eq!(results[1].snippet, "Full page body");
        assert!(results.iter().all(|r| r.provider == SearchProvider::Jina));
    }

    #[test]
    fn items_without_url_are_skipped() {
        let body =
            r#"{"data":[{"title":"No link"},{"title":"Linked","url":"https://ok.example"}]}"#;
        let results = parse_jina_json(body).expect("parse");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://ok.example");
    }

    #[test]
    fn missing_title_defaults_to_untitled() {
        let body = r#"{"data":[{"url":"https://ok.example"}]}"#;
        let results = parse_jina_json(body).expect("parse");
        assert_eq!(results[0].title, "Untitled");
        assert!(results[0].snippet.is_empty());
    }

    #[test]
    fn snippet_truncated_to_300_chars() {
        let long = "x".repeat(1000);
        let body = format!(r#"{{"data":[{{"url":"https://ok.example","content":"{long}"}}]}}"#);
        let results = parse_jina_json(&body).expect("parse");
        assert_eq!(results[0].snippet.chars().count(), 300);
    }

    #[test]
    fn non_json_is_malformed() {
        let err = parse_jina_json("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, SearchError::MalformedResponse(_)));
    }

    #[test]
    fn missing_data_is_malformed() {
        let err = parse_jina_json(r#"{"code":402}"#).unwrap_err();
        assert!(err.to_string().contains("data"));
    }
}
