//! URL normalisation for result deduplication.
//!
//! Produces a comparison key so that links which differ only in case,
//! query-parameter order, tracking parameters, fragments, default ports or
//! a trailing slash are treated as the same page. The key is never shown to
//! callers; results keep the URL exactly as the provider returned it.

use url::Url;

/// Tracking query parameters that are stripped during normalisation.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "utm_id",
    "fbclid",
    "gclid",
    "msclkid",
    "yclid",
    "mc_cid",
    "mc_eid",
    "_ga",
    "ref",
    "si",
];

/// Build the deduplication key for a URL.
///
/// Applies the following transformations:
///
/// 1. Lowercase scheme, host and path.
/// 2. Remove default ports (`:80` for HTTP, `:443` for HTTPS).
/// 3. Remove the fragment.
/// 4. Strip known tracking parameters (matched case-insensitively).
/// 5. Sort remaining query parameters by key, then value.
/// 6. Remove a trailing slash from the path (unless the path is `"/"`).
///
/// Input that does not parse as a URL is trimmed and lowercased.
///
/// # Examples
///
/// ```
/// use dossier_search::aggregator::url_normalize::normalize_url;
///
/// let a = normalize_url("https://Example.COM/Report/?b=2&a=1#summary");
/// let b = normalize_url("https://example.com/report?a=1&b=2&utm_source=feed");
/// assert_eq!(a, b);
/// ```
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let Ok(mut parsed) = Url::parse(trimmed) else {
        return trimmed.to_lowercase();
    };

    parsed.set_fragment(None);

    if is_default_port(&parsed) {
        let _ = parsed.set_port(None);
    }

    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.to_lowercase().as_str()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    params.sort();

    if params.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(&params);
    }

    let path = parsed.path().to_lowercase();
    let path = if path.len() > 1 && path.ends_with('/') {
        &path[..path.len() - 1]
    } else {
        path.as_str()
    };
    let path = path.to_owned();
    parsed.set_path(&path);

    // Url::parse already lowercases scheme and host.
    parsed.to_string()
}

/// Returns `true` if the URL uses the default port for its scheme.
fn is_default_port(url: &Url) -> bool {
    matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    )
}
