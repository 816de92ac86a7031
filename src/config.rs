//! Configuration for the dossier pipeline.
//!
//! Loaded from a TOML file where every field is optional, then overlaid
//! with credentials and model overrides from the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use dossier_search::config::usable_credential;
use dossier_search::{ExtractionConfig, SearchConfig};

use crate::error::{DossierError, Result};
use crate::generation::GenerationConfig;
use crate::research::ResearchConfig;

/// Environment variables read by [`DossierConfig::apply_env`].
pub mod env_vars {
    pub const JINA_API_KEY: &str = "JINA_API_KEY";
    pub const GOOGLE_SEARCH_KEY: &str = "GOOGLE_SEARCH_KEY";
    pub const GOOGLE_CSE_ID: &str = "GOOGLE_CSE_ID";
    /// Used for both the SERP search fallback and the rendering fetch.
    pub const SCRAPINGANT_API_KEY: &str = "SCRAPINGANT_API_KEY";
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    pub const GEMINI_MODEL_NAME: &str = "GEMINI_MODEL_NAME";
    pub const HUGGINGFACE_API_KEY: &str = "HUGGINGFACE_API_KEY";
    pub const HUGGINGFACE_MODEL_NAME: &str = "HUGGINGFACE_MODEL_NAME";
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DossierConfig {
    /// Search provider chain.
    pub search: SearchConfig,
    /// Page fetch strategies and cleaning thresholds.
    pub extraction: ExtractionConfig,
    /// Generation provider chain.
    pub generation: GenerationConfig,
    /// Deep search pool, deadline and quality gate.
    pub research: ResearchConfig,
}

impl DossierConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| DossierError::Config(format!("{}: {e}", path.display())))
    }

    /// Load the effective configuration.
    ///
    /// Reads `path` if given, otherwise the default path when that file
    /// exists, otherwise starts from defaults. The environment is applied
    /// on top and the result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file cannot be read, any file cannot
    /// be parsed, or the merged configuration is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_config_path();
                if default_path.is_file() {
                    tracing::debug!(path = %default_path.display(), "loading config");
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Returns the default config file path: `<config dir>/dossier/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = dirs::config_dir() {
            config.join("dossier").join("config.toml")
        } else if let Some(home) = dirs::home_dir() {
            home.join(".config").join("dossier").join("config.toml")
        } else {
            PathBuf::from("/tmp/dossier-config/config.toml")
        }
    }

    /// Overlay credentials and model names from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Overlay credentials and model names from `lookup`.
    ///
    /// Blank values are ignored, so an empty variable never clears a key
    /// set in the file.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| {
            lookup(name).and_then(|v| usable_credential(Some(v.as_str())).map(str::to_owned))
        };

        if let Some(v) = get(env_vars::JINA_API_KEY) {
            self.search.jina.api_key = Some(v);
        }
        if let Some(v) = get(env_vars::GOOGLE_SEARCH_KEY) {
            self.search.google_cse.api_key = Some(v);
        }
        if let Some(v) = get(env_vars::GOOGLE_CSE_ID) {
            self.search.google_cse.cx = Some(v);
        }
        if let Some(v) = get(env_vars::SCRAPINGANT_API_KEY) {
            self.search.scrapingant.api_key = Some(v.clone());
            self.extraction.render_api_key = Some(v);
        }
        if let Some(v) = get(env_vars::GEMINI_API_KEY) {
            self.generation.gemini.api_key = Some(v);
        }
        if let Some(v) = get(env_vars::GEMINI_MODEL_NAME) {
            self.generation.gemini.model = v;
        }
        if let Some(v) = get(env_vars::HUGGINGFACE_API_KEY) {
            self.generation.huggingface.api_key = Some(v);
        }
        if let Some(v) = get(env_vars::HUGGINGFACE_MODEL_NAME) {
            self.generation.huggingface.model = v;
        }
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first section error found.
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        self.extraction.validate()?;
        self.generation.validate()?;
        self.research.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(DossierConfig::default().validate().is_ok());
    }

    #[test]
    fn env_overlay_sets_credentials() {
        let mut config = DossierConfig::default();
        config.apply_env_from(env(&[
            ("JINA_API_KEY", "jina"),
            ("GOOGLE_SEARCH_KEY", "gkey"),
            ("GOOGLE_CSE_ID", "gcx"),
            ("SCRAPINGANT_API_KEY", "ant"),
            ("GEMINI_API_KEY", "gem"),
            ("GEMINI_MODEL_NAME", "gemini-2.0-flash"),
            ("HUGGINGFACE_API_KEY", "hf"),
            (
                "HUGGINGFACE_MODEL_NAME",
                "mistralai/Mistral-7B-Instruct-v0.3",
            ),
        ]));

        assert_eq!(config.search.jina.api_key.as_deref(), Some("jina"));
        assert_eq!(config.search.google_cse.api_key.as_deref(), Some("gkey"));
        assert_eq!(config.search.google_cse.cx.as_deref(), Some("gcx"));
        assert_eq!(config.search.scrapingant.api_key.as_deref(), Some("ant"));
        assert_eq!(config.extraction.render_api_key.as_deref(), Some("ant"));
        assert_eq!(config.generation.gemini.api_key.as_deref(), Some("gem"));
        assert_eq!(config.generation.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.generation.huggingface.api_key.as_deref(), Some("hf"));
        assert_eq!(
            config.generation.huggingface.model,
            "mistralai/Mistral-7B-Instruct-v0.3"
        );
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = DossierConfig::default();
        config.generation.gemini.api_key = Some("from-file".into());
        let blank = env(&[("GEMINI_API_KEY", "   "), ("GEMINI_MODEL_NAME", "")]);
        config.apply_env_from(blank);
        assert_eq!(
            config.generation.gemini.api_key.as_deref(),
            Some("from-file")
        );
        assert_eq!(config.generation.gemini.model, "gemini-1.5-flash");
    }

    #[test]
    fn missing_env_leaves_providers_unconfigured() {
        let mut config = DossierConfig::default();
        config.apply_env_from(env(&[]));
        assert!(config.search.jina.api_key.is_none());
        assert!(!config.extraction.has_render_credentials());
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = DossierConfig::from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(DossierError::Io(_))));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = DossierConfig::default_config_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.ends_with("config.toml"));
        assert!(path_str.contains("dossier"));
    }

    #[test]
    fn config_serializes_to_toml() {
        let toml_str = toml::to_string_pretty(&DossierConfig::default()).expect("serialize");
        assert!(toml_str.contains("[search.jina]"));
        assert!(toml_str.contains("min_source_chars"));
        assert!(toml_str.contains("gemini-1.5-flash"));
    }
}
