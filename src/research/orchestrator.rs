//! Deep search: search, extract every hit, fold usable pages into a corpus.

use std::sync::Arc;

use async_trait::async_trait;
use dossier_search::{ContentExtractor, ExtractedPage, SearchAggregator};
use futures_util::StreamExt;
use serde_json::{Map, Value};
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::ResearchConfig;
use super::corpus::{CorpusBuilder, ResearchCorpus};
use crate::config::DossierConfig;
use crate::error::Result;

/// Fetches one page for the orchestrator.
///
/// [`ContentExtractor`] is the production implementation.
#[async_trait]
pub trait PageExtractor: Send + Sync {
    /// Fetch and clean `url`; `None` when nothing usable came back.
    async fn extract_page(&self, url: &str) -> Option<ExtractedPage>;
}

#[async_trait]
impl PageExtractor for ContentExtractor {
    async fn extract_page(&self, url: &str) -> Option<ExtractedPage> {
        ContentExtractor::extract_page(self, url).await
    }
}

/// Drives the search aggregator and content extractor for one query.
pub struct ResearchOrchestrator {
    search: SearchAggregator,
    extractor: Arc<dyn PageExtractor>,
    config: ResearchConfig,
}

impl ResearchOrchestrator {
    /// Build the production pipeline with one shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DossierError`] if any section of `config` is
    /// invalid or the HTTP client cannot be built.
    pub fn from_config(config: &DossierConfig) -> Result<Self> {
        config.validate()?;
        let client = dossier_search::http::build_client(config.search.user_agent.as_deref())?;
        let search = SearchAggregator::with_client(&config.search, &client);
        let extractor = ContentExtractor::with_client(config.extraction.clone(), client);
        Ok(Self::new(search, Arc::new(extractor), config.research.clone()))
    }

    pub fn new(
        search: SearchAggregator,
        extractor: Arc<dyn PageExtractor>,
        config: ResearchConfig,
    ) -> Self {
        Self {
            search,
            extractor,
            config,
        }
    }

    pub fn search(&self) -> &SearchAggregator {
        &self.search
    }

    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    /// Run the whole pipeline and return the annotated corpus text, or one
    /// of the two fixed soft-failure messages.
    pub async fn perform_deep_search(
        &self,
        query: &str,
        context_data: &Map<String, Value>,
        max_results: usize,
    ) -> String {
        self.research(query, context_data, max_results, &CancellationToken::new())
            .await
            .combined_text
    }

    /// Run the pipeline under the configured overall deadline.
    pub async fn research(
        &self,
        query: &str,
        context_data: &Map<String, Value>,
        max_results: usize,
        cancel: &CancellationToken,
    ) -> ResearchCorpus {
        let deadline = Instant::now() + Duration::from_secs(self.config.deadline_seconds);
        self.research_until(query, context_data, max_results, deadline, cancel)
            .await
    }

    /// Run the pipeline until `deadline` or until `cancel` fires.
    ///
    /// Pages extracted before the deadline are still folded into the
    /// corpus; extractions in flight are dropped.
    pub async fn research_until(
        &self,
        query: &str,
        context_data: &Map<String, Value>,
        max_results: usize,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> ResearchCorpus {
        tracing::trace!(query, "deep search query");
        let context_fields = context_data.len();
        tracing::info!(max_results, context_fields, "starting deep search");

        let stop = async {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep_until(deadline) => {}
            }
        };
        let search = self
            .search
            .multi_search_until(query, max_results, stop)
            .await;
        let results = search.results;
        if results.is_empty() {
            if search.stopped {
                tracing::warn!("deep search stopped before any provider answered");
            } else {
                tracing::warn!("deep search found no sources");
            }
            return ResearchCorpus::no_sources(query, search.stopped);
        }
        if search.stopped {
            tracing::warn!(
                sources = results.len(),
                "deep search stopped during search, keeping results found so far"
            );
        }

        let expiry = tokio::time::sleep_until(deadline);
        tokio::pin!(expiry);

        let mut pages: Vec<Option<ExtractedPage>> = vec![None; results.len()];
        let extractor = &self.extractor;
        let mut extractions = futures_util::stream::iter(results.iter().enumerate())
            .map(|(index, result)| async move {
                (index, extractor.extract_page(&result.url).await)
            })
            .buffer_unordered(self.config.concurrency);

        let timed_out = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::warn!("deep search cancelled, keeping pages extracted so far");
                    break true;
                }
                _ = &mut expiry => {
                    tracing::warn!("deep search deadline reached, keeping pages extracted so far");
                    break true;
                }
                next = extractions.next() => match next {
                    Some((index, page)) => pages[index] = page,
                    None => break false,
                },
            }
        };
        let timed_out = timed_out || search.stopped;
        drop(extractions);

        let mut builder = CorpusBuilder::new(query);
        for (result, page) in results.iter().zip(pages) {
            match page {
                Some(page) if page.length > self.config.min_source_chars => {
                    builder.push_source(&[&result.title, &page.title], &result.url, &page.text);
                }
                Some(page) => {
                    tracing::debug!(
                        url = %result.url,
                        length = page.length,
                        "source below quality gate"
                    );
                }
                None => {
                    tracing::debug!(url = %result.url, "no content extracted");
                }
            }
        }

        let corpus = builder.finish(results.len(), timed_out);
        if corpus.has_content() {
            tracing::info!(
                sources_considered = corpus.sources_considered,
                sources_usable = corpus.sources_usable,
                timed_out,
                "deep search complete"
            );
        } else {
            tracing::error!(
                sources_considered = corpus.sources_considered,
                "sources found but no usable content extracted"
            );
        }
        corpus
    }
}

impl std::fmt::Debug for ResearchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchOrchestrator")
            .field("search", &self.search)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
