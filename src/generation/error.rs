//! Error types for generation providers.
//!
//! Each variant carries a stable error code (SCREAMING_SNAKE_CASE) that is
//! included in the Display output and accessible via
//! [`GenerationError::code()`].

/// Stable error codes for programmatic error handling.
pub mod error_codes {
    /// The provider has no usable API key.
    pub const MISSING_CREDENTIALS: &str = "MISSING_CREDENTIALS";

    /// Timeout, connection failure, or body read failure.
    pub const TRANSPORT_FAILED: &str = "TRANSPORT_FAILED";

    /// The provider answered with a non-2xx status.
    pub const UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";

    /// The response body did not have the expected shape.
    pub const MALFORMED_RESPONSE: &str = "MALFORMED_RESPONSE";
}

/// Errors produced by a single generation provider call.
///
/// The router records these per attempt and moves on to the next provider;
/// they never escape [`crate::generation::GenerationRouter::generate`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerationError {
    #[error("[{}] {}", error_codes::MISSING_CREDENTIALS, .0)]
    MissingCredentials(String),

    #[error("[{}] {}", error_codes::TRANSPORT_FAILED, .0)]
    Transport(String),

    #[error("[{}] HTTP {status}: {message}", error_codes::UPSTREAM_ERROR)]
    Upstream { status: u16, message: String },

    #[error("[{}] {}", error_codes::MALFORMED_RESPONSE, .0)]
    MalformedResponse(String),
}

impl GenerationError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredentials(_) => error_codes::MISSING_CREDENTIALS,
            Self::Transport(_) => error_codes::TRANSPORT_FAILED,
            Self::Upstream { .. } => error_codes::UPSTREAM_ERROR,
            Self::MalformedResponse(_) => error_codes::MALFORMED_RESPONSE,
        }
    }

    /// Returns the inner message without the code prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::MissingCredentials(m)
            | Self::Transport(m)
            | Self::MalformedResponse(m)
            | Self::Upstream { message: m, .. } => m,
        }
    }

    /// Classify a [`reqwest::Error`] raised while talking to `provider`.
    ///
    /// The request URL is dropped from the message since some providers
    /// accept keys as query parameters.
    pub(crate) fn from_reqwest(provider: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Transport(format!("{provider} request timed out"));
        }
        if err.is_decode() {
            return Self::MalformedResponse(format!("{provider} response could not be decoded"));
        }
        let mut msg = err.to_string();
        if let Some(url) = err.url() {
            msg = msg.replace(url.as_str(), "<redacted>");
        }
        Self::Transport(format!("{provider} request failed: {msg}"))
    }
}

/// Convenience alias for generation results.
pub type Result<T> = std::result::Result<T, GenerationError>;
