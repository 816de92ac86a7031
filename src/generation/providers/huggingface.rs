//! Hugging Face Inference API provider.
//!
//! Secondary in the default chain. Cold models answer `503` while they load,
//! which is reported as a distinct upstream error so logs say why.

use std::time::Duration;

use async_trait::async_trait;
use dossier_search::config::usable_credential;
use serde_json::json;

use crate::generation::config::HuggingFaceConfig;
use crate::generation::error::GenerationError;
use crate::generation::provider::{GenerationProvider, GenerationProviderKind};

use super::{send, upstream_error};

/// Hugging Face text-generation client.
pub struct HuggingFaceProvider {
    config: HuggingFaceConfig,
    client: reqwest::Client,
}

impl HuggingFaceProvider {
    pub fn new(config: HuggingFaceConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(&self, prompt: &str, max_tokens: u32) -> serde_json::Value {
        json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": max_tokens,
                "temperature": self.config.temperature,
                "return_full_text": false,
            },
        })
    }
}

#[async_trait]
impl GenerationProvider for HuggingFaceProvider {
    fn kind(&self) -> GenerationProviderKind {
        GenerationProviderKind::HuggingFace
    }

    fn is_configured(&self) -> bool {
        usable_credential(self.config.api_key.as_deref()).is_some()
    }

    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<Option<String>, GenerationError> {
        let Some(api_key) = usable_credential(self.config.api_key.as_deref()) else {
            return Err(GenerationError::MissingCredentials(
                "Hugging Face API key not configured".into(),
            ));
        };
        tracing::debug!(model = %self.config.model, max_tokens, "Hugging Face request");

        let request = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&self.request_body(prompt, max_tokens));

        let (status, body) = send(
            request,
            Duration::from_secs(self.config.timeout_seconds),
            "Hugging Face",
        )
        .await?;

        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                message: format!("model {} is loading", self.config.model),
            });
        }
        if !status.is_success() {
            return Err(upstream_error("Hugging Face", status, &body));
        }
        parse_huggingface_response(&body)
    }
}

/// Extract `generated_text` from `[{"generated_text": ..}]` (or the bare
/// object some pipelines return).
pub(crate) fn parse_huggingface_response(body: &str) -> Result<Option<String>, GenerationError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        GenerationError::MalformedResponse(format!("Hugging Face payload is not valid JSON: {e}"))
    })?;

    let entry = match &value {
        serde_json::Value::Array(items) => items.first(),
        serde_json::Value::Object(_) => Some(&value),
        _ => None,
    };
    let Some(text) = entry
        .and_then(|e| e.get("generated_text"))
        .and_then(|t| t.as_str())
    else {
        if value.as_array().is_some_and(|items| items.is_empty()) {
            return Ok(None);
        }
        return Err(GenerationError::MalformedResponse(
            "Hugging Face payload has no generated_text".into(),
        ));
    };

    let text = text.trim();
    if text.is_empty() {
        tracing::warn!("Hugging Face returned empty text");
        return Ok(None);
    }
    Ok(Some(text.to_owned()))
}
