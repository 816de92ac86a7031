//! Error types for the dossier-search crate.
//!
//! Every variant is a *soft* failure from the point of view of the public
//! API: the aggregator and extractor catch them at their fallback loops and
//! degrade to fewer results or `None`. No API keys or sensitive data appear
//! in error messages.

/// Errors produced by a single provider or fetch attempt.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// The provider has no usable credentials and was not contacted.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// Timeout, DNS failure, refused connection, or body read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The upstream service answered with a non-2xx status.
    #[error("upstream error: HTTP {status}: {message}")]
    Upstream {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Short description of the failing request.
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The URL is not an absolute http(s) URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to pull usable content out of an HTML document.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search or extraction configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Classify a [`reqwest::Error`] raised while talking to `target`.
    pub(crate) fn from_reqwest(target: &str, err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Upstream {
                status: status.as_u16(),
                message: format!("{target} request rejected"),
            };
        }
        if err.is_timeout() {
            Self::Transport(format!("{target} request timed out"))
        } else if err.is_decode() {
            Self::MalformedResponse(format!("{target} response could not be decoded"))
        } else {
            Self::Transport(format!("{target} request failed: {}", without_url(err)))
        }
    }

    /// Returns `true` when the failure happened before any network I/O.
    pub fn is_missing_credentials(&self) -> bool {
        matches!(self, Self::MissingCredentials(_))
    }
}

/// Render a reqwest error without the request URL, which can carry API keys
/// in query parameters.
fn without_url(err: &reqwest::Error) -> String {
    let mut msg = err.to_string();
    if let Some(url) = err.url() {
        msg = msg.replace(url.as_str(), "<redacted>");
    }
    msg
}

/// Convenience type alias for dossier-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_credentials() {
        let err = SearchError::MissingCredentials("Jina API key not configured".into());
        assert_eq!(
            err.to_string(),
            "missing credentials: Jina API key not configured"
        );
        assert!(err.is_missing_credentials());
    }

    #[test]
    fn display_transport() {
        let err = SearchError::Transport("connection refused".into());
        assert_eq!(err.to_string(), "transport error: connection refused");
        assert!(!err.is_missing_credentials());
    }

    #[test]
    fn display_upstream_includes_status() {
        let err = SearchError::Upstream {
            status: 429,
            message: "Google CSE request rejected".into(),
        };
        assert_eq!(
            err.to_string(),
            "upstream error: HTTP 429: Google CSE request rejected"
        );
    }

    #[test]
    fn display_malformed() {
        let err = SearchError::MalformedResponse("missing `data` array".into());
        assert_eq!(err.to_string(), "malformed response: missing `data` array");
    }

    #[test]
    fn display_invalid_url() {
        let err = SearchError::InvalidUrl("ftp://example.com".into());
        assert_eq!(err.to_string(), "invalid URL: ftp://example.com");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("max_chars must be > 0".into());
        assert_eq!(err.to_string(), "config error: max_chars must be > 0");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
