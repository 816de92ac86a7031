//! Generation router: ordered provider fallback for text generation.
//!
//! Providers are tried one at a time in priority order. The first provider
//! that returns non-empty text wins; everything else is recorded and the
//! chain moves on. Nothing is retried.

use std::sync::Arc;

use super::config::GenerationConfig;
use super::error::GenerationError;
use super::provider::{GenerationProvider, GenerationProviderKind, provider_for};
use crate::error::{DossierError, Result};

/// What happened when the router reached one provider.
#[derive(Debug, Clone)]
pub enum GenerationAttempt {
    /// No usable credentials; no request was made.
    Unavailable,
    /// The provider returned text. Terminal.
    Succeeded,
    /// The call completed but produced no usable text.
    Empty,
    /// Transport, status or payload failure.
    Failed(GenerationError),
}

/// Result of one routed generation call.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutcome {
    /// The generated text, if any provider produced some.
    pub text: Option<String>,
    /// The provider that produced `text`.
    pub provider_used: Option<GenerationProviderKind>,
    /// `true` when every provider was unavailable, empty or failed.
    pub failed: bool,
    /// Attempts in chain order. Providers after the winner are absent.
    pub attempts: Vec<(GenerationProviderKind, GenerationAttempt)>,
}

/// Routes prompts through generation providers in a fixed priority order.
#[derive(Clone)]
pub struct GenerationRouter {
    providers: Vec<Arc<dyn GenerationProvider>>,
    default_max_tokens: u32,
}

impl GenerationRouter {
    /// Build the production provider chain described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError::Config`] if the configuration is invalid or
    /// the HTTP client cannot be built.
    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| DossierError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(config, &client))
    }

    /// Build the provider chain sharing an existing HTTP client.
    pub fn with_client(config: &GenerationConfig, client: &reqwest::Client) -> Self {
        let providers = config
            .providers
            .iter()
            .map(|kind| provider_for(*kind, config, client))
            .collect();
        Self {
            providers,
            default_max_tokens: config.max_tokens,
        }
    }

    /// Build a router over explicit providers, tried in the given order.
    pub fn with_providers(
        providers: Vec<Arc<dyn GenerationProvider>>,
        default_max_tokens: u32,
    ) -> Self {
        Self {
            providers,
            default_max_tokens,
        }
    }

    /// The provider chain in priority order.
    pub fn providers(&self) -> Vec<GenerationProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    /// Which providers have usable credentials, in chain order.
    pub fn availability(&self) -> Vec<(GenerationProviderKind, bool)> {
        self.providers
            .iter()
            .map(|p| (p.kind(), p.is_configured()))
            .collect()
    }

    pub fn default_max_tokens(&self) -> u32 {
        self.default_max_tokens
    }

    /// Generate text for `prompt`, or `None` if no provider produced any.
    ///
    /// `max_tokens` of `None` uses the configured default.
    pub async fn generate(&self, prompt: &str, max_tokens: Option<u32>) -> Option<String> {
        self.generate_outcome(prompt, max_tokens).await.text
    }

    /// Same as [`generate`](Self::generate) but reports every attempt.
    pub async fn generate_outcome(
        &self,
        prompt: &str,
        max_tokens: Option<u32>,
    ) -> GenerationOutcome {
        let max_tokens = max_tokens.unwrap_or(self.default_max_tokens);
        let mut attempts = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let kind = provider.kind();

            if !provider.is_configured() {
                tracing::debug!(provider = %kind, "generation provider has no credentials");
                attempts.push((kind, GenerationAttempt::Unavailable));
                continue;
            }

            let attempt = match provider.generate(prompt, max_tokens).await {
                Ok(Some(text)) => {
                    let chars = text.chars().count();
                    tracing::info!(provider = %kind, chars, "generation succeeded");
                    attempts.push((kind, GenerationAttempt::Succeeded));
                    return GenerationOutcome {
                        text: Some(text),
                        provider_used: Some(kind),
                        failed: false,
                        attempts,
                    };
                }
                Ok(None) => {
                    tracing::warn!(provider = %kind, "generation provider returned no text");
                    GenerationAttempt::Empty
                }
                Err(GenerationError::MissingCredentials(_)) => GenerationAttempt::Unavailable,
                Err(err) => {
                    tracing::warn!(
                        provider = %kind,
                        code = err.code(),
                        error = %err,
                        "generation provider failed, trying next"
                    );
                    GenerationAttempt::Failed(err)
                }
            };
            attempts.push((kind, attempt));
        }

        tracing::error!("all generation providers were unavailable or failed");
        GenerationOutcome {
            failed: true,
            attempts,
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for GenerationRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationRouter")
            .field("providers", &self.providers())
            .field("default_max_tokens", &self.default_max_tokens)
            .finish()
    }
}
