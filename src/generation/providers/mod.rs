//! Generation provider implementations.
//!
//! Each module provides a struct implementing
//! [`crate::generation::GenerationProvider`] for one external API.

pub mod gemini;
pub mod huggingface;

pub use gemini::GeminiProvider;
pub use huggingface::HuggingFaceProvider;

use std::time::Duration;

use super::error::GenerationError;

/// Longest upstream error message kept in a [`GenerationError::Upstream`].
const MAX_UPSTREAM_MESSAGE_CHARS: usize = 200;

/// Send `request` with `timeout` and return the status and body text.
///
/// Non-2xx statuses are returned, not mapped, so providers can give
/// specific statuses their own meaning.
pub(crate) async fn send(
    request: reqwest::RequestBuilder,
    timeout: Duration,
    provider: &str,
) -> Result<(reqwest::StatusCode, String), GenerationError> {
    let response = request
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| GenerationError::from_reqwest(provider, &e))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| GenerationError::from_reqwest(provider, &e))?;
    Ok((status, body))
}

/// Build an upstream error, preferring the message the provider put in its
/// error body (`{"error": {"message": ..}}` or `{"error": ".."}`).
pub(crate) fn upstream_error(
    provider: &str,
    status: reqwest::StatusCode,
    body: &str,
) -> GenerationError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            let error = v.get("error")?;
            error
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| error.as_str())
                .map(|m| truncate_chars(m, MAX_UPSTREAM_MESSAGE_CHARS))
        });

    GenerationError::Upstream {
        status: status.as_u16(),
        message: match detail {
            Some(detail) => format!("{provider}: {detail}"),
            None => format!("{provider} returned {status}"),
        },
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
