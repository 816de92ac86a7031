//! Order-preserving result deduplication by normalised URL.
//!
//! The first occurrence of a URL wins: results from earlier providers in
//! the chain take precedence over later duplicates, and the relative order
//! of surviving results is never changed.

use std::collections::HashSet;

use crate::types::SearchResult;

use super::url_normalize::normalize_url;

/// Tracks which normalised URLs have already been accepted.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the not-yet-seen results from `incoming` to `accumulator`.
    ///
    /// Returns how many results were accepted.
    pub fn extend(
        &mut self,
        accumulator: &mut Vec<SearchResult>,
        incoming: Vec<SearchResult>,
    ) -> usize {
        let before = accumulator.len();
        for result in incoming {
            if self.seen.insert(normalize_url(&result.url)) {
                accumulator.push(result);
            }
        }
        accumulator.len() - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SearchProvider;

    fn make_result(url: &str, provider: SearchProvider) -> SearchResult {
        SearchResult {
            title: format!("Title from {provider}"),
            url: url.to_string(),
            snippet: format!("Snippet from {provider}"),
            provider,
        }
    }

    fn deduplicate(results: Vec<SearchResult>) -> Vec<SearchResult> {
        let mut out = Vec::with_capacity(results.len());
        Deduplicator::new().extend(&mut out, results);
        out
    }

    #[test]
    fn unique_urls_pass_through_in_order() {
        let results = vec![
            make_result("https://b.com", SearchProvider::Jina),
            make_result("https://a.com", SearchProvider::Jina),
        ];
        let deduped = deduplicate(results);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].url, "https://b.com");
        assert_eq!(deduped[1].url, "https://a.com");
    }

    #[test]
    fn first_occurrence_wins() {
        let results = vec![
            make_result("https://example.com/page", SearchProvider::Jina),
            make_result("https://example.com/page", SearchProvider::GoogleCse),
        ];
        let deduped = deduplicate(results);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].provider, SearchProvider::Jina);
    }

    #[test]
    fn normalisation_merges_equivalent_urls() {
        let results = vec![
            make_result("https://Example.COM/path/", SearchProvider::GoogleCse),
            make_result(
                "https://example.com/path?utm_source=x",
                SearchProvider::ScrapingAnt,
            ),
        ];
        let deduped = deduplicate(results);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].url, "https://Example.COM/path/");
    }

    #[test]
    fn extend_reports_accepted_count_across_batches() {
        let mut dedup = Deduplicator::new();
        let mut acc = Vec::new();

        let first = vec![
            make_result("https://a.com", SearchProvider::Jina),
            make_result("https://b.com", SearchProvider::Jina),
        ];
        assert_eq!(dedup.extend(&mut acc, first), 2);

        let second = vec![
            make_result("https://b.com/", SearchProvider::GoogleCse),
            make_result("https://c.com", SearchProvider::GoogleCse),
        ];
        assert_eq!(dedup.extend(&mut acc, second), 1);

        let urls: Vec<&str> = acc.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, ["https://a.com", "https://b.com", "https://c.com"]);
        assert_eq!(acc[1].provider, SearchProvider::Jina);
    }

    #[test]
    fn duplicates_within_one_batch_removed() {
        let results = vec![
            make_result("https://a.com", SearchProvider::ScrapingAnt),
            make_result("https://a.com#frag", SearchProvider::ScrapingAnt),
        ];
        assert_eq!(deduplicate(results).len(), 1);
    }

    #[test]
    fn empty_input_returns_empty() {
        assert!(deduplicate(vec![]).is_empty());
    }
}
