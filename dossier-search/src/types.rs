//! Core types for search results, provider identification, and extracted pages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single search result returned by one of the search providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result page.
    pub title: String,
    /// The URL of the result. Unique (after normalisation) within one
    /// aggregated result set.
    pub url: String,
    /// A short text snippet describing the page.
    pub snippet: String,
    /// Which provider returned this result.
    pub provider: SearchProvider,
}

/// Search providers known to the aggregator.
///
/// The variant order of [`SearchProvider::all`] is the default fallback
/// order: content-rich semantic search first, quota-limited structured
/// search second, SERP scraping last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchProvider {
    /// Jina AI search (`s.jina.ai`), returns clean titles and descriptions.
    Jina,
    /// Google Custom Search JSON API, 100 free queries per day.
    GoogleCse,
    /// ScrapingAnt proxy scraping the Google results page.
    ScrapingAnt,
}

impl SearchProvider {
    /// Returns the human-readable name of this provider.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jina => "Jina",
            Self::GoogleCse => "Google CSE",
            Self::ScrapingAnt => "ScrapingAnt",
        }
    }

    /// Returns all providers in default priority order.
    pub fn all() -> &'static [SearchProvider] {
        &[Self::Jina, Self::GoogleCse, Self::ScrapingAnt]
    }
}

impl fmt::Display for SearchProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cleaned content of a fetched web page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedPage {
    /// The URL that was fetched.
    pub url: String,
    /// The page `<title>`, empty when the document has none.
    pub title: String,
    /// Cleaned text with boilerplate and short lines removed.
    pub text: String,
    /// Length of `text` in characters.
    pub length: usize,
}

impl ExtractedPage {
    /// Build a page, computing `length` from the text.
    pub fn new(url: impl Into<String>, title: impl Into<String>, text: String) -> Self {
        let length = text.chars().count();
        Self {
            url: url.into(),
            title: title.into(),
            text,
            length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_result_construction() {
        let result = SearchResult {
            title: "Example".into(),
            url: "https://example.com".into(),
            snippet: "An example page".into(),
            provider: SearchProvider::Jina,
        };
        assert_eq!(result.title, "Example");
        assert_eq!(result.provider, SearchProvider::Jina);
    }

    #[test]
    fn provider_display_names() {
        assert_eq!(SearchProvider::Jina.to_string(), "Jina");
        assert_eq!(SearchProvider::GoogleCse.to_string(), "Google CSE");
        assert_eq!(SearchProvider::ScrapingAnt.to_string(), "ScrapingAnt");
    }

    #[test]
    fn provider_default_order() {
        assert_eq!(
            SearchProvider::all(),
            &[
                SearchProvider::Jina,
                SearchProvider::GoogleCse,
                SearchProvider::ScrapingAnt
            ]
        );
    }

    #[test]
    fn provider_serde_uses_snake_case() {
        let json = serde_json::to_string(&SearchProvider::GoogleCse).expect("serialize");
        assert_eq!(json, "\"google_cse\"");
        let decoded: SearchProvider =
            serde_json::from_str("\"scraping_ant\"").expect("deserialize");
        assert_eq!(decoded, SearchProvider::ScrapingAnt);
    }

    #[test]
    fn provider_hashes_by_variant() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(SearchProvider::Jina);
        set.insert(SearchProvider::Jina);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn extracted_page_length_counts_chars() {
        let page = ExtractedPage::new("https://example.com", "Title", "héllo".to_owned());
        assert_eq!(page.length, 5);
        assert_eq!(page.title, "Title");
    }
}
