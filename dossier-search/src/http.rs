//! Shared HTTP client with browser-like identification.
//!
//! One [`reqwest::Client`] is built per service and reused for every
//! provider call; timeouts are applied per request so each provider can
//! keep its own budget.

use crate::error::SearchError;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Realistic browser User-Agent strings.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Build a [`reqwest::Client`] for provider APIs and page fetches.
///
/// The client has:
/// - Cookie store enabled (consent redirects on news sites)
/// - A random browser User-Agent (or the custom one, if given)
/// - Brotli and gzip decompression
/// - At most 10 redirects
///
/// # Errors
///
/// Returns [`SearchError::Config`] if the client cannot be constructed.
pub fn build_client(user_agent: Option<&str>) -> Result<reqwest::Client, SearchError> {
    let ua = user_agent.unwrap_or_else(|| random_user_agent());

    reqwest::Client::builder()
        .cookie_store(true)
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {e}")))
}

/// Select a random User-Agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        // SAFETY: USER_AGENTS is a non-empty const array, choose only returns None on empty slices
        .unwrap_or(USER_AGENTS[0])
}

/// Send `request` with `timeout`, mapping transport failures and non-2xx
/// statuses to [`SearchError`].
///
/// `target` names the provider in error messages.
pub(crate) async fn send_checked(
    request: reqwest::RequestBuilder,
    timeout: Duration,
    target: &str,
) -> Result<reqwest::Response, SearchError> {
    let response = request
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| SearchError::from_reqwest(target, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::Upstream {
            status: status.as_u16(),
            message: format!("{target} returned {status}"),
        });
    }
    Ok(response)
}

/// Read a response body as text.
pub(crate) async fn read_text(
    response: reqwest::Response,
    target: &str,
) -> Result<String, SearchError> {
    response
        .text()
        .await
        .map_err(|e| SearchError::from_reqwest(target, &e))
}
