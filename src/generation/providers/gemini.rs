//! Google Gemini provider (`generateContent`).
//!
//! Primary in the default chain. Safety filters are set to `BLOCK_NONE` for
//! the four configurable harm categories. A response that is still blocked
//! comes back without text and is reported as empty.

use std::time::Duration;

use async_trait::async_trait;
use dossier_search::config::usable_credential;
use serde::Deserialize;
use serde_json::json;

use crate::generation::config::GeminiConfig;
use crate::generation::error::GenerationError;
use crate::generation::provider::{GenerationProvider, GenerationProviderKind};

use super::{send, upstream_error};

const HARM_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Gemini `generateContent` client.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(&self, prompt: &str, max_tokens: u32) -> serde_json::Value {
        let safety: Vec<_> = HARM_CATEGORIES
            .iter()
            .map(|category| json!({"category": category, "threshold": "BLOCK_NONE"}))
            .collect();
        json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": self.config.temperature,
                "topP": self.config.top_p,
                "topK": self.config.top_k,
                "maxOutputTokens": max_tokens,
            },
            "safetySettings": safety,
        })
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn kind(&self) -> GenerationProviderKind {
        GenerationProviderKind::Gemini
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
            return Err(GenerationError::MissingCredentials("Gemini API key not configured".into()));
        };
        tracing::debug!(model = %self.config.model, max_tokens, "Gemini request");

        let request = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&self.request_body(prompt, max_tokens));

        let (status, body) = send(
            request,
            Duration::from_secs(self.config.timeout_seconds),
            "Gemini",
        )
        .await?;
        if !status.is_success() {
            return Err(upstream_error("Gemini", status, &body));
        }
        parse_gemini_response(&body)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Concatenate the text parts of the first candidate.
///
/// Returns `Ok(None)` when there is no text, logging why if the API said.
pub(crate) fn parse_gemini_response(body: &str) -> Result<Option<String>, GenerationError> {
    let parsed: GeminiResponse = serde_json::from_str(body).map_err(|e| {
        GenerationError::MalformedResponse(format!("Gemini payload is not valid JSON: {e}"))
    })?;

    let first = parsed.candidates.into_iter().next();
    let finish_reason = first.as_ref().and_then(|c| c.finish_reason.clone());
    let text: String = first
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        let block_reason = parsed.prompt_feedback.and_then(|f| f.block_reason);
        tracing::warn!(
            block_reason = block_reason.as_deref().unwrap_or("none"),
            finish_reason = finish_reason.as_deref().unwrap_or("none"),
            "Gemini returned no text"
        );
        return Ok(None);
    }
    Ok(Some(text))
}
