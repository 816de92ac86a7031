//! Page content extractor with a primary and a fallback fetch strategy.
//!
//! The rendering service is tried first when a key is configured; a direct
//! fetch with a browser User-Agent is the fallback. Each strategy makes at
//! most one request. Failures are logged per attempt and surface to callers
//! only as `None`.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use url::Url;

use crate::config::{usable_credential, ExtractionConfig};
use crate::content;
use crate::error::{Result, SearchError};
use crate::http;
use crate::types::ExtractedPage;

/// How a page was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchStrategy {
    /// Through the rendering fetch service.
    Rendered,
    /// Plain GET against the page itself.
    Direct,
}

impl FetchStrategy {
    /// Attempt order.
    pub fn all() -> &'static [FetchStrategy] {
        &[Self::Rendered, Self::Direct]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rendered => "rendered",
            Self::Direct => "direct",
        }
    }
}

impl std::fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fetches a URL and returns its cleaned main text.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    config: ExtractionConfig,
    client: reqwest::Client,
}

impl ContentExtractor {
    /// Build an extractor with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid or the
    /// client cannot be built.
    pub fn from_config(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;
        let client = http::build_client(config.user_agent.as_deref())?;
        Ok(Self { config, client })
    }

    /// Build an extractor sharing an existing HTTP client.
    pub fn with_client(config: ExtractionConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Fetch `url` and return its cleaned text, or `None` if neither
    /// strategy produced usable content.
    pub async fn extract_content(&self, url: &str) -> Option<String> {
        self.extract_page(url).await.map(|page| page.text)
    }

    /// Like [`extract_content`](Self::extract_content) but keeps the page
    /// title.
    pub async fn extract_page(&self, url: &str) -> Option<ExtractedPage> {
        match self.try_extract(url).await {
            Ok(page) => Some(page),
            Err(err) => {
                tracing::debug!(url, error = %err, "no usable content extracted");
                None
            }
        }
    }

    /// Run the strategies in order and return the first usable page.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidUrl`] for non-http(s) input (no request
    /// is made), otherwise the error of the last strategy attempted.
    pub async fn try_extract(&self, url: &str) -> Result<ExtractedPage> {
        let target = parse_web_url(url)?;
        let mut last_error = SearchError::MissingCredentials("no fetch strategy available".into());

        for strategy in FetchStrategy::all() {
            match self.fetch_with(*strategy, &target).await {
                Ok(page) => {
                    tracing::debug!(url, %strategy, length = page.length, "page extracted");
                    return Ok(page);
                }
                Err(err) if err.is_missing_credentials() => {
                    tracing::trace!(url, %strategy, "strategy not configured");
                    last_error = err;
                }
                Err(err) => {
                    tracing::warn!(url, %strategy, error = %err, "fetch strategy failed");
                    last_error = err;
                }
            }
        }
        Err(last_error)
    }

    async fn fetch_with(&self, strategy: FetchStrategy, target: &Url) -> Result<ExtractedPage> {
        let html = match strategy {
            FetchStrategy::Rendered => self.fetch_rendered(target).await?,
            FetchStrategy::Direct => self.fetch_direct(target).await?,
        };

        let page = content::extract_page(&html, target.as_str(), self.config.cleaning_rules())?;
        if page.length <= self.config.min_content_chars {
            return Err(SearchError::Parse(format!(
                "only {} characters of content after cleaning",
                page.length
            )));
        }
        Ok(page)
    }

    async fn fetch_rendered(&self, target: &Url) -> Result<String> {
        let Some(api_key) = usable_credential(self.config.render_api_key.as_deref()) else {
            return Err(SearchError::MissingCredentials(
                "rendering service API key not configured".into(),
            ));
        };

        let request = self
            .client
            .get(&self.config.render_base_url)
            .query(&[("url", target.as_str()), ("browser", "false")])
            .header("x-api-key", api_key);

        let response = http::send_checked(
            request,
            Duration::from_secs(self.config.render_timeout_seconds),
            "rendering service",
        )
        .await?;
        http::read_text(response, "rendering service").await
    }

    async fn fetch_direct(&self, target: &Url) -> Result<String> {
        let user_agent = self
            .config
            .user_agent
            .as_deref()
            .unwrap_or_else(|| http::random_user_agent());

        let request = self
            .client
            .get(target.clone())
            .header(USER_AGENT, user_agent)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            );

        let response = http::send_checked(
            request,
            Duration::from_secs(self.config.direct_timeout_seconds),
            "direct fetch",
        )
        .await?;

        if let Some(kind) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_textual(kind) {
                return Err(SearchError::MalformedResponse(format!(
                    "unsupported content type {kind}"
                )));
            }
        }
        http::read_text(response, "direct fetch").await
    }
}

/// Parse `raw` as an absolute http(s) URL.
///
/// # Errors
///
/// Returns [`SearchError::InvalidUrl`] for anything else.
pub fn parse_web_url(raw: &str) -> Result<Url> {
    let parsed =
        Url::parse(raw.trim()).map_err(|e| SearchError::InvalidUrl(format!("{raw}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        scheme => Err(SearchError::InvalidUrl(format!("unsupported scheme `{scheme}`"))),
    }
}

fn is_textual(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime.starts_with("text/") || mime == "application/xhtml+xml" || mime.is_empty()
}
