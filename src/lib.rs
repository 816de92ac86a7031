//! Dossier: resilient multi-provider research acquisition.
//!
//! Turns a query into a text research context and routes prompts to
//! text-generation providers, tolerating the failure of any single
//! provider.
//!
//! # Architecture
//!
//! The pipeline is built from independent services, each walking a fixed
//! provider chain:
//! - **Search**: Jina, then Google Custom Search, then ScrapingAnt (`dossier-search`)
//! - **Extraction**: rendering service, then direct fetch (`dossier-search`)
//! - **Research**: search, extract every hit in a bounded pool, fold usable
//!   pages into one annotated corpus
//! - **Generation**: Gemini, then Hugging Face

pub mod config;
pub mod error;
pub mod generation;
pub mod research;

pub use config::DossierConfig;
pub use error::{DossierError, Result};
pub use generation::{GenerationOutcome, GenerationRouter};
pub use research::{ResearchCorpus, ResearchOrchestrator};

pub use dossier_search::{ContentExtractor, SearchAggregator, SearchResult};
