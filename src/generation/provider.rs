//! Generation provider trait and the closed set of provider kinds.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::config::GenerationConfig;
use super::error::GenerationError;
use super::providers::{GeminiProvider, HuggingFaceProvider};

/// Available text generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationProviderKind {
    /// Google Gemini `generateContent` API.
    Gemini,
    /// Hugging Face Inference API.
    HuggingFace,
}

impl GenerationProviderKind {
    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::HuggingFace => "Hugging Face",
        }
    }

    /// Default priority order.
    pub fn all() -> &'static [GenerationProviderKind] {
        &[Self::Gemini, Self::HuggingFace]
    }
}

impl fmt::Display for GenerationProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One text generation backend.
///
/// `Ok(None)` means the call succeeded but produced no usable text (a
/// safety block, an empty completion); the router treats it like a
/// failure and moves on.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn kind(&self) -> GenerationProviderKind;

    /// Whether the provider has usable credentials. Unconfigured providers
    /// are skipped without any network call.
    fn is_configured(&self) -> bool;

    /// Generate a completion for `prompt`, bounded to `max_tokens`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] on missing credentials, transport
    /// failures, non-2xx statuses, or malformed payloads.
    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<Option<String>, GenerationError>;
}

/// Build the production provider for `kind`.
pub fn provider_for(
    kind: GenerationProviderKind,
    config: &GenerationConfig,
    client: &reqwest::Client,
) -> Arc<dyn GenerationProvider> {
    match kind {
        GenerationProviderKind::Gemini => {
            Arc::new(GeminiProvider::new(config.gemini.clone(), client.clone()))
        }
        GenerationProviderKind::HuggingFace => {
            Arc::new(HuggingFaceProvider::new(config.huggingface.clone(), client.clone()))
        }
    }
}
