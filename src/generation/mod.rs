//! Text generation with ordered provider fallback.
//!
//! [`GenerationRouter`] tries each configured [`GenerationProvider`] in
//! priority order (Gemini, then Hugging Face by default) and returns the
//! first non-empty completion.

pub mod config;
pub mod error;
pub mod provider;
pub mod providers;
pub mod router;

pub use config::{GeminiConfig, GenerationConfig, HuggingFaceConfig};
pub use error::GenerationError;
pub use provider::{GenerationProvider, GenerationProviderKind, provider_for};
pub use router::{GenerationAttempt, GenerationOutcome, GenerationRouter};
