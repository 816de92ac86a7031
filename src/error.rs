//! Error types for the dossier pipeline.

use dossier_search::SearchError;

/// Top-level error type.
///
/// Provider failures never reach this type: search, extraction and
/// generation recover them inside their fallback loops. What remains are
/// setup problems and the explicit "nothing produced text" outcome.
#[derive(Debug, thiserror::Error)]
pub enum DossierError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Search or extraction service could not be constructed.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Every provider in a fallback chain was unavailable or failed.
    #[error("all {chain} providers were unavailable or failed")]
    ExhaustedFallback {
        /// Which chain ran out (`"generation"`, `"search"`).
        chain: &'static str,
    },
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, DossierError>;
