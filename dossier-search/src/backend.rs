//! Trait definition for pluggable search provider backends.
//!
//! Each provider (Jina, Google CSE, ScrapingAnt) implements
//! [`SearchBackend`] so the aggregator can walk the fallback chain without
//! knowing provider details. Tests substitute their own backends through
//! [`crate::SearchAggregator::with_backends`].

use async_trait::async_trait;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::providers::{GoogleCseBackend, JinaBackend, ScrapingAntBackend};
use crate::types::{SearchProvider, SearchResult};

/// A search provider backend.
///
/// Implementors own their endpoint configuration and a shared HTTP client,
/// and handle their own:
///
/// - request construction and authentication
/// - response parsing into [`SearchResult`] values
/// - mapping of transport, status and payload failures to [`SearchError`]
///
/// All implementations must be `Send + Sync`.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Which [`SearchProvider`] this backend represents.
    fn provider(&self) -> SearchProvider;

    /// Whether the backend has usable credentials. Unconfigured backends
    /// are skipped without any network call.
    fn is_configured(&self) -> bool;

    /// Run one bounded-timeout search.
    ///
    /// `limit` is the number of results the caller still needs; providers
    /// that support a page size use it, others may return more.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] on missing credentials, transport failures,
    /// non-2xx statuses, or malformed payloads.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError>;
}

/// Build the production backend for `provider`.
pub fn backend_for(
    provider: SearchProvider,
    config: &SearchConfig,
    client: &reqwest::Client,
) -> Box<dyn SearchBackend> {
    match provider {
        SearchProvider::Jina => Box::new(JinaBackend::new(config.jina.clone(), client.clone())),
        SearchProvider::GoogleCse => {
            Box::new(GoogleCseBackend::new(config.google_cse.clone(), client.clone()))
        }
        SearchProvider::ScrapingAnt => {
            Box::new(ScrapingAntBackend::new(config.scrapingant.clone(), client.clone()))
        }
    }
}
