//! # dossier-search
//!
//! Web data acquisition for dossier: multi-provider search with ordered
//! fallback, and page content extraction with a primary and a fallback
//! fetch strategy.
//!
//! ## Design
//!
//! - Search providers (Jina, Google Custom Search, ScrapingAnt) are tried
//!   strictly in priority order until enough unique results are collected
//! - Providers without credentials are skipped without a network call
//! - Results are deduplicated by normalised URL, first occurrence wins
//! - Page extraction strips boilerplate with CSS selectors and keeps only
//!   sentence-like lines
//! - Every failure is soft: callers get fewer results or `None`
//!
//! ## Security
//!
//! - API keys come from configuration and never appear in errors or logs
//! - Search queries are logged only at trace level
//! - Only absolute http(s) URLs are ever fetched

pub mod aggregator;
pub mod backend;
pub mod config;
pub mod content;
pub mod error;
pub mod extractor;
pub mod http;
pub mod providers;
pub mod types;

pub use aggregator::{AggregatedSearch, ProviderAttempt, SearchAggregator};
pub use backend::SearchBackend;
pub use config::{ExtractionConfig, SearchConfig};
pub use content::CleaningRules;
pub use error::{Result, SearchError};
pub use extractor::{ContentExtractor, FetchStrategy};
pub use types::{ExtractedPage, SearchProvider, SearchResult};

/// Search the web through the provider chain in `config`.
///
/// Convenience wrapper that builds a [`SearchAggregator`] for one call.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid. Provider failures
/// never surface as errors; they only shrink the result list.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> dossier_search::Result<()> {
/// let config = dossier_search::SearchConfig::default();
/// let results = dossier_search::search("rust programming", &config).await?;
/// for result in &results {
///     println!("{}: {}", result.title, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<Vec<SearchResult>> {
    let aggregator = SearchAggregator::from_config(config)?;
    Ok(aggregator.multi_search(query, config.max_results).await)
}

/// Fetch and clean the readable text of one page.
///
/// Convenience wrapper that builds a [`ContentExtractor`] for one call.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid. A page that
/// cannot be fetched or has no usable content yields `Ok(None)`.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> dossier_search::Result<()> {
/// let config = dossier_search::ExtractionConfig::default();
/// if let Some(page) = dossier_search::fetch_page_content("https://example.com", &config).await? {
///     println!("{}: {} chars", page.title, page.length);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn fetch_page_content(
    url: &str,
    config: &ExtractionConfig,
) -> Result<Option<ExtractedPage>> {
    let extractor = ContentExtractor::from_config(config.clone())?;
    Ok(extractor.extract_page(url).await)
}
