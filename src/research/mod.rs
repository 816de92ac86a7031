//! Deep web research: search, extract, and consolidate into one corpus.

pub mod corpus;
pub mod orchestrator;

pub use corpus::{NO_SOURCES_MESSAGE, NO_USABLE_CONTENT_MESSAGE, ResearchCorpus};
pub use orchestrator::{PageExtractor, ResearchOrchestrator};

use serde::{Deserialize, Serialize};

use crate::error::DossierError;

/// Deep search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Search results to request per query.
    pub max_results: usize,
    /// Pages extracted at the same time.
    pub concurrency: usize,
    /// Extracted text must be longer than this to enter the corpus.
    pub min_source_chars: usize,
    /// Overall budget for one deep search, search included.
    pub deadline_seconds: u64,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            concurrency: 6,
            min_source_chars: 150,
            deadline_seconds: 180,
        }
    }
}

impl ResearchConfig {
    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError::Config`] if any value is zero.
    pub fn validate(&self) -> Result<(), DossierError> {
        if self.max_results == 0 {
            return Err(DossierError::Config("research.max_results must be greater than 0".into()));
        }
        if self.concurrency == 0 {
            return Err(DossierError::Config("research.concurrency must be greater than 0".into()));
        }
        if self.deadline_seconds == 0 {
            return Err(DossierError::Config(
                "research.deadline_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
