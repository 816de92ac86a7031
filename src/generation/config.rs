//! Generation provider configuration.

use serde::{Deserialize, Serialize};

use super::provider::GenerationProviderKind;
use crate::error::DossierError;

/// Provider chain and per-provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Providers in priority order.
    pub providers: Vec<GenerationProviderKind>,
    /// Token budget used when the caller does not pass one.
    pub max_tokens: u32,
    pub gemini: GeminiConfig,
    pub huggingface: HuggingFaceConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            providers: GenerationProviderKind::all().to_vec(),
            max_tokens: 8192,
            gemini: GeminiConfig::default(),
            huggingface: HuggingFaceConfig::default(),
        }
    }
}

impl GenerationConfig {
    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError::Config`] for a zero token budget, a zero
    /// timeout, or a provider listed twice.
    pub fn validate(&self) -> Result<(), DossierError> {
        if self.max_tokens == 0 {
            return Err(DossierError::Config("generation.max_tokens must be greater than 0".into()));
        }
        if self.gemini.timeout_seconds == 0 || self.huggingface.timeout_seconds == 0 {
            return Err(DossierError::Config("generation timeouts must be greater than 0".into()));
        }
        for (i, kind) in self.providers.iter().enumerate() {
            if self.providers[..i].contains(kind) {
                return Err(DossierError::Config(format!(
                    "generation provider {kind} listed more than once"
                )));
            }
        }
        Ok(())
    }
}

/// Google Gemini settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    /// API root; the request goes to `{base_url}/v1beta/models/{model}:generateContent`.
    pub base_url: String,
    pub timeout_seconds: u64,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".into(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            timeout_seconds: 120,
            temperature: 0.7,
            top_p: 0.95,
            top_k: 64,
        }
    }
}

/// Hugging Face Inference API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HuggingFaceConfig {
    pub api_key: Option<String>,
    pub model: String,
    /// API root; the request goes to `{base_url}/models/{model}`.
    pub base_url: String,
    pub timeout_seconds: u64,
    pub temperature: f32,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "meta-llama/Meta-Llama-3-8B".into(),
            base_url: "https://api-inference.huggingface.co".into(),
            timeout_seconds: 60,
            temperature: 0.7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GenerationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.huggingface.model, "meta-llama/Meta-Llama-3-8B");
        assert_eq!(config.huggingface.timeout_seconds, 60);
    }

    #[test]
    fn zero_max_tokens_rejected() {
        let config = GenerationConfig {
            max_tokens: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
    }

    #[test]
    fn duplicate_provider_rejected() {
        let config = GenerationConfig {
            providers: vec![
                GenerationProviderKind::Gemini,
                GenerationProviderKind::Gemini,
            ],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Gemini"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = GenerationConfig::default();
        config.huggingface.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }
}
