//! Search aggregator: ordered provider fallback with deduplication.
//!
//! Providers are walked strictly in chain order, one at a time. A provider
//! without credentials is skipped without a network call; a failing
//! provider is logged and the next one is tried. The chain stops as soon
//! as enough unique results have been collected, or when the caller's stop
//! signal fires.

pub mod dedup;
pub mod url_normalize;

use std::future::Future;

use crate::backend::{backend_for, SearchBackend};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::types::{SearchProvider, SearchResult};

use dedup::Deduplicator;

/// What happened when the aggregator reached one provider in the chain.
#[derive(Debug, Clone)]
pub enum ProviderAttempt {
    /// No usable credentials; no request was made.
    Skipped,
    /// The provider answered; `accepted` results were new after dedup.
    Returned { received: usize, accepted: usize },
    /// The request failed and the chain moved on.
    Failed(SearchError),
}

/// Results of one aggregated search plus the per-provider attempt log.
#[derive(Debug, Clone, Default)]
pub struct AggregatedSearch {
    /// Unique results in accumulation order, at most `max_results`.
    pub results: Vec<SearchResult>,
    /// Attempts in chain order. Providers after the stopping point are absent.
    pub attempts: Vec<(SearchProvider, ProviderAttempt)>,
    /// The stop signal fired before the chain finished. `results` holds
    /// what earlier providers returned.
    pub stopped: bool,
}

/// Queries search providers in a fixed priority order and merges their
/// results.
pub struct SearchAggregator {
    backends: Vec<Box<dyn SearchBackend>>,
}

impl SearchAggregator {
    /// Build the production provider chain described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let client = http::build_client(config.user_agent.as_deref())?;
        Ok(Self::with_client(config, &client))
    }

    /// Build the provider chain sharing an existing HTTP client.
    pub fn with_client(config: &SearchConfig, client: &reqwest::Client) -> Self {
        let backends = config
            .providers
            .iter()
            .map(|provider| backend_for(*provider, config, client))
            .collect();
        Self { backends }
    }

    /// Build an aggregator over explicit backends, tried in the given order.
    pub fn with_backends(backends: Vec<Box<dyn SearchBackend>>) -> Self {
        Self { backends }
    }

    /// The provider chain in priority order.
    pub fn providers(&self) -> Vec<SearchProvider> {
        self.backends.iter().map(|b| b.provider()).collect()
    }

    /// Which providers have usable credentials, in chain order.
    pub fn availability(&self) -> Vec<(SearchProvider, bool)> {
        self.backends
            .iter()
            .map(|b| (b.provider(), b.is_configured()))
            .collect()
    }

    /// Search for `query` and return at most `max_results` unique results.
    ///
    /// Never fails: provider errors are logged and skipped, and an empty
    /// list means no provider produced anything.
    pub async fn multi_search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        self.multi_search_detailed(query, max_results).await.results
    }

    /// Same as [`multi_search`](Self::multi_search) but also reports what
    /// happened at each provider.
    pub async fn multi_search_detailed(&self, query: &str, max_results: usize) -> AggregatedSearch {
        self.multi_search_until(query, max_results, std::future::pending())
            .await
    }

    /// Same as [`multi_search_detailed`](Self::multi_search_detailed), but
    /// the chain ends early once `stop` completes.
    ///
    /// The request in flight is dropped; results from providers that already
    /// answered are kept and `stopped` is set.
    pub async fn multi_search_until<F>(
        &self,
        query: &str,
        max_results: usize,
        stop: F,
    ) -> AggregatedSearch
    where
        F: Future<Output = ()>,
    {
        let mut outcome = AggregatedSearch::default();
        if max_results == 0 {
            return outcome;
        }

        tokio::pin!(stop);
        let mut dedup = Deduplicator::new();

        for backend in &self.backends {
            if outcome.results.len() >= max_results {
                break;
            }
            let provider = backend.provider();

            if !backend.is_configured() {
                tracing::debug!(%provider, "provider has no credentials, skipping");
                outcome.attempts.push((provider, ProviderAttempt::Skipped));
                continue;
            }

            let needed = max_results - outcome.results.len();
            let response = tokio::select! {
                biased;
                _ = &mut stop => {
                    tracing::warn!(%provider, "search stopped before provider answered");
                    outcome.stopped = true;
                    break;
                }
                response = backend.search(query, needed) => response,
            };

            let attempt = match response {
                Ok(batch) => {
                    let received = batch.len();
                    let accepted = dedup.extend(&mut outcome.results, batch);
                    tracing::debug!(%provider, received, accepted, "provider returned results");
                    ProviderAttempt::Returned { received, accepted }
                }
                Err(err) if err.is_missing_credentials() => {
                    tracing::debug!(%provider, "provider has no credentials, skipping");
                    ProviderAttempt::Skipped
                }
                Err(err) => {
                    tracing::warn!(%provider, error = %err, "search provider failed");
                    ProviderAttempt::Failed(err)
                }
            };
            outcome.attempts.push((provider, attempt));
        }

        outcome.results.truncate(max_results);
        tracing::debug!(
            count = outcome.results.len(),
            stopped = outcome.stopped,
            "multi-search finished"
        );
        outcome
    }
}

impl std::fmt::Debug for SearchAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchAggregator")
            .field("providers", &self.providers())
            .finish()
    }
}
