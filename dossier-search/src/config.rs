//! Search and extraction configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the provider chain, per-provider credentials,
//! endpoints and timeouts. [`ExtractionConfig`] controls the two page fetch
//! strategies and the text cleaning thresholds. Both deserialize from TOML
//! with every field optional.

use serde::{Deserialize, Serialize};

use crate::content::CleaningRules;
use crate::error::SearchError;
use crate::types::SearchProvider;

/// Returns the credential if it is present and not blank.
pub fn usable_credential(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Configuration for the search provider chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Provider fallback order. Earlier providers win on duplicate URLs.
    pub providers: Vec<SearchProvider>,
    /// Default number of unique results to collect.
    pub max_results: usize,
    /// Jina AI search settings.
    pub jina: JinaConfig,
    /// Google Custom Search settings.
    pub google_cse: GoogleCseConfig,
    /// ScrapingAnt SERP scraping settings.
    pub scrapingant: ScrapingAntSearchConfig,
    /// Custom User-Agent. If `None`, a realistic browser UA is chosen.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            providers: SearchProvider::all().to_vec(),
            max_results: 10,
            jina: JinaConfig::default(),
            google_cse: GoogleCseConfig::default(),
            scrapingant: ScrapingAntSearchConfig::default(),
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration.
    ///
    /// Checks:
    /// - `max_results` must be greater than 0
    /// - every provider timeout must be greater than 0
    /// - a provider may appear at most once in `providers`
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config("max_results must be greater than 0".into()));
        }
        let timeouts = [
            (SearchProvider::Jina, self.jina.timeout_seconds),
            (SearchProvider::GoogleCse, self.google_cse.timeout_seconds),
            (SearchProvider::ScrapingAnt, self.scrapingant.timeout_seconds),
        ];
        for (provider, secs) in timeouts {
            if secs == 0 {
                return Err(SearchError::Config(format!(
                    "{provider} timeout_seconds must be greater than 0"
                )));
            }
        }
        for (i, provider) in self.providers.iter().enumerate() {
            if self.providers[..i].contains(provider) {
                return Err(SearchError::Config(format!(
                    "provider {provider} listed more than once"
                )));
            }
        }
        Ok(())
    }
}

/// Jina AI search endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JinaConfig {
    /// Bearer token.
    pub api_key: Option<String>,
    /// Base URL; the encoded query is appended directly.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for JinaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://s.jina.ai/".into(),
            timeout_seconds: 25,
        }
    }
}

/// Google Custom Search JSON API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleCseConfig {
    /// API key (`key` parameter).
    pub api_key: Option<String>,
    /// Search engine ID (`cx` parameter).
    pub cx: Option<String>,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for GoogleCseConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            cx: None,
            base_url: "https://www.googleapis.com/customsearch/v1".into(),
            timeout_seconds: 15,
        }
    }
}

/// ScrapingAnt settings when used to scrape a Google results page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapingAntSearchConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Interface language passed to Google as `hl`.
    pub language: String,
}

impl Default for ScrapingAntSearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.scrapingant.com/v2/general".into(),
            timeout_seconds: 30,
            language: "en".into(),
        }
    }
}

/// Configuration for page content extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// API key for the rendering fetch service. `None` skips the primary
    /// strategy.
    pub render_api_key: Option<String>,
    /// Rendering fetch service endpoint.
    pub render_base_url: String,
    /// Timeout for the rendering fetch in seconds.
    pub render_timeout_seconds: u64,
    /// Timeout for the direct fetch in seconds.
    pub direct_timeout_seconds: u64,
    /// Maximum characters of cleaned text to keep.
    pub max_chars: usize,
    /// Lines with fewer words than this are dropped as navigation noise.
    pub min_words_per_line: usize,
    /// Cleaned text must be longer than this to count as a successful fetch.
    pub min_content_chars: usize,
    /// Custom User-Agent for direct fetches.
    pub user_agent: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            render_api_key: None,
            render_base_url: "https://api.scrapingant.com/v2/general".into(),
            render_timeout_seconds: 45,
            direct_timeout_seconds: 20,
            max_chars: 15_000,
            min_words_per_line: 6,
            min_content_chars: 100,
            user_agent: None,
        }
    }
}

impl ExtractionConfig {
    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_chars == 0 {
            return Err(SearchError::Config("max_chars must be greater than 0".into()));
        }
        if self.render_timeout_seconds == 0 || self.direct_timeout_seconds == 0 {
            return Err(SearchError::Config("extraction timeouts must be greater than 0".into()));
        }
        if self.min_content_chars >= self.max_chars {
            return Err(SearchError::Config(
                "min_content_chars must be smaller than max_chars".into(),
            ));
        }
        Ok(())
    }

    /// Whether the rendering fetch strategy can be used.
    pub fn has_render_credentials(&self) -> bool {
        usable_credential(self.render_api_key.as_deref()).is_some()
    }

    /// Line filter and length budget used when cleaning fetched pages.
    pub fn cleaning_rules(&self) -> CleaningRules {
        CleaningRules {
            min_words_per_line: self.min_words_per_line,
            max_chars: self.max_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_search_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.max_results, 10);
        assert_eq!(config.providers, SearchProvider::all());
        assert_eq!(config.jina.timeout_seconds, 25);
        assert_eq!(config.google_cse.timeout_seconds, 15);
        assert_eq!(config.scrapingant.timeout_seconds, 30);
        assert!(config.user_agent.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_max_results_rejected() {
        let config = SearchConfig {
            max_results: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_results"));
    }

    #[test]
    fn zero_provider_timeout_rejected() {
        let mut config = SearchConfig::default();
        config.google_cse.timeout_seconds = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Google CSE"));
    }

    #[test]
    fn duplicate_provider_rejected() {
        let config = SearchConfig {
            providers: vec![SearchProvider::Jina, SearchProvider::Jina],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn empty_provider_list_is_valid() {
        let config = SearchConfig {
            providers: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn search_config_deserializes_partial_toml_like_json() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"providers": ["google_cse"], "jina": {"api_key": "k"}}"#)
                .expect("deserialize");
        assert_eq!(config.providers, vec![SearchProvider::GoogleCse]);
        assert_eq!(config.jina.api_key.as_deref(), Some("k"));
        assert_eq!(config.jina.base_url, "https://s.jina.ai/");
        assert_eq!(config.max_results, 10);
    }

    #[test]
    fn default_extraction_config_matches_budgets() {
        let config = ExtractionConfig::default();
        assert_eq!(config.render_timeout_seconds, 45);
        assert_eq!(config.direct_timeout_seconds, 20);
        assert_eq!(config.max_chars, 15_000);
        assert_eq!(config.min_words_per_line, 6);
        assert_eq!(config.min_content_chars, 100);
        assert!(!config.has_render_credentials());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn cleaning_rules_follow_config() {
        let config = ExtractionConfig {
            min_words_per_line: 3,
            max_chars: 500,
            ..Default::default()
        };
        assert_eq!(
            config.cleaning_rules(),
            CleaningRules {
                min_words_per_line: 3,
                max_chars: 500
            }
        );
        assert_eq!(
            ExtractionConfig::default().cleaning_rules(),
            CleaningRules::default()
        );
    }

    #[test]
    fn extraction_zero_max_chars_rejected() {
        let config = ExtractionConfig {
            max_chars: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn extraction_threshold_above_budget_rejected() {
        let config = ExtractionConfig {
            max_chars: 50,
            min_content_chars: 100,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_content_chars"));
    }
}
