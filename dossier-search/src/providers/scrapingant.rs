//! ScrapingAnt SERP fallback: scrapes a Google results page through a
//! scraping proxy.
//!
//! Last in the default chain: slowest and most fragile, since it depends on
//! Google's result markup (`div.g` blocks with an `h3` title).

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use crate::backend::SearchBackend;
use crate::config::{usable_credential, ScrapingAntSearchConfig};
use crate::error::SearchError;
use crate::http;
use crate::types::{SearchProvider, SearchResult};

const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";

/// ScrapingAnt-backed Google results scraper.
pub struct ScrapingAntBackend {
    config: ScrapingAntSearchConfig,
    client: reqwest::Client,
}

impl ScrapingAntBackend {
    pub fn new(config: ScrapingAntSearchConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Build the Google results URL that ScrapingAnt should fetch.
    fn google_url(&self, query: &str) -> Result<Url, SearchError> {
        Url::parse_with_params(
            GOOGLE_SEARCH_URL,
            &[("q", query), ("hl", self.config.language.as_str())],
        )
        .map_err(|e| SearchError::Config(format!("invalid Google search URL: {e}")))
    }
}

#[async_trait]
impl SearchBackend for ScrapingAntBackend {
    fn provider(&self) -> SearchProvider {
        SearchProvider::ScrapingAnt
    }

    fn is_configured(&self) -> bool {
        usable_credential(self.config.api_key.as_deref()).is_some()
    }

    async fn search(&self, query: &str, _limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        let Some(api_key) = usable_credential(self.config.api_key.as_deref()) else {
            return Err(SearchError::MissingCredentials(
                "ScrapingAnt API key not configured".into(),
            ));
        };
        tracing::trace!(query, "ScrapingAnt SERP search");

        let target = self.google_url(query)?;
        let request = self
            .client
            .get(&self.config.base_url)
            .query(&[("url", target.as_str()), ("browser", "false")])
            .header("x-api-key", api_key);

        let response = http::send_checked(
            request,
            Duration::from_secs(self.config.timeout_seconds),
            "ScrapingAnt",
        )
        .await?;
        let html = http::read_text(response, "ScrapingAnt").await?;

        tracing::trace!(bytes = html.len(), "ScrapingAnt response received");
        parse_google_serp_html(&html)
    }
}

/// Parse a Google results page into search results.
///
/// Extracted as a separate function for testability with canned HTML.
pub(crate) fn parse_google_serp_html(html: &str) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(html);

    let block_sel = Selector::parse("div.g")
        .map_err(|e| SearchError::Parse(format!("invalid block selector: {e:?}")))?;
    let link_sel = Selector::parse("a")
        .map_err(|e| SearchError::Parse(format!("invalid link selector: {e:?}")))?;
    let title_sel = Selector::parse("h3")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let snippet_sel = Selector::parse(r#"div[style*="-webkit-box"]"#)
        .map_err(|e| SearchError::Parse(format!("invalid snippet selector: {e:?}")))?;

    let mut results = Vec::new();

    for block in document.select(&block_sel) {
        let Some(href) = block
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };
        let Some(title_el) = block.select(&title_sel).next() else {
            continue;
        };

        if !is_web_url(href) {
            continue;
        }

        let title = title_el.text().collect::<String>().trim().to_owned();
        let snippet = block
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_owned())
            .unwrap_or_else(|| "No snippet.".to_owned());

        results.push(SearchResult {
            title,
            url: href.to_owned(),
            snippet,
            provider: SearchProvider::ScrapingAnt,
        });
    }

    Ok(results)
}

/// Only absolute http(s) links are real results; relative links point back
/// into Google.
fn is_web_url(href: &str) -> bool {
    Url::parse(href)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERP: &str = r#"<html><body><div id="search">
        <div class="g">
            <a href="https://first.example/page"><h3>First result</h3></a>
            <div style="-webkit-line-clamp:2;display: -webkit-box">First snippet text</div>
        </div>
        <div class="g">
            <a href="https://second.example/"><h3>Second result</h3></a>
        </div>
        <div class="g">
            <a href="/search?q=related"><h3>Related searches</h3></a>
        </div>
        <div class="g">
            <a href="https://no-title.example/">No heading here</a>
        </div>
    </div></body></html>"#;

    #[test]
    fn parses_result_blocks() {
        let results = parse_google_serp_html(SERP).expect("parse");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "First result");
        assert_eq!(results[0].url, "https://first.example/page");
        assert_eq!(results[0].snippet, "First snippet text");
        assert_eq!(results[0].provider, SearchProvider::ScrapingAnt);
    }

    #[test]
    fn missing_snippet_gets_placeholder() {
        let results = parse_google_serp_html(SERP).expect("parse");
        assert_eq!(results[1].snippet, "No snippet.");
    }

    #[test]
    fn relative_links_skipped() {
        let results = parse_google_serp_html(SERP).expect("parse");
        assert!(results.iter().all(|r| !r.url.starts_with('/')));
    }

    #[test]
    fn page_without_blocks_yields_empty() {
        let results = parse_google_serp_html("<html><body>captcha</body></html>").expect("parse");
        assert!(results.is_empty());
    }

    #[test]
    fn google_url_encodes_query_and_language() {
        let backend = ScrapingAntBackend::new(
            ScrapingAntSearchConfig {
                language: "pt-BR".into(),
                ..Default::default()
            },
            reqwest::Client::new(),
        );
        let url = backend.google_url("market trends & data").expect("url");
        assert_eq!(url.host_str(), Some("www.google.com"));
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("q".into(), "market trends & data".into())));
        assert!(pairs.contains(&("hl".into(), "pt-BR".into())));
    }
}
