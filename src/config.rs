//! Run configuration loaded from a JSON file.
//!
//! ```json
//! {
//!     "search_phrase": "economy",
//!     "category": "business",
//!     "months": 1,
//!     "source": "https://apnews.com"
//! }
//! ```
//!
//! All four keys are required. Extra keys are ignored.

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info, instrument};
use url::Url;

/// Search parameters for one run. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Phrase typed into the site's search box.
    pub search_phrase: String,
    /// Logged with the search parameters; the site search is not narrowed by it.
    pub category: String,
    /// Size of the recency window, in 30-day months.
    pub months: u32,
    /// Front page of the news site.
    pub source: Url,
}

impl Config {
    /// Load and validate the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, is not valid
    /// JSON, lacks a key, or holds a value of the wrong shape.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let result = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|raw| Self::from_json(&raw, path));

        match &result {
            Ok(config) => info!(
                search_phrase = %config.search_phrase,
                months = config.months,
                "Configuration loaded"
            ),
            Err(e) => error!(error = %e, "Error loading configuration"),
        }
        result
    }

    /// Parse and validate configuration text. `path` is only used in errors.
    pub fn from_json(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate(path)
    }

    fn validate(self, path: &Path) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        if self.search_phrase.trim().is_empty() {
            return Err(invalid("search_phrase must not be blank"));
        }
        if !matches!(self.source.scheme(), "http" | "https") {
            return Err(invalid("source must be an http(s) URL"));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "search_phrase": "economy",
        "category": "business",
        "months": 2,
        "source": "https://apnews.com"
    }"#;

    #[test]
    fn test_load_valid_config() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, VALID).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.search_phrase, "economy");
        assert_eq!(config.category, "business");
        assert_eq!(config.months, 2);
        assert_eq!(config.source.as_str(), "https://apnews.com/");
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let raw = r#"{
            "search_phrase": "economy",
            "category": "business",
            "months": 0,
            "source": "https://apnews.com",
            "comment": "weekly run"
        }"#;
        let config = Config::from_json(raw, Path::new("config.json")).unwrap();
        assert_eq!(config.months, 0);
    }

    #[test]
    fn test_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Config::load(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_missing_key() {
        let raw = r#"{"search_phrase": "economy", "category": "business", "months": 1}"#;
        let err = Config::from_json(raw, Path::new("config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("source"));
    }

    #[test]
    fn test_negative_months_rejected() {
        let raw = r#"{
            "search_phrase": "economy",
            "category": "business",
            "months": -1,
            "source": "https://apnews.com"
        }"#;
        let err = Config::from_json(raw, Path::new("config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = Config::from_json("{ not json", Path::new("config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_blank_phrase_rejected() {
        let raw = r#"{
            "search_phrase": "   ",
            "category": "business",
            "months": 1,
            "source": "https://apnews.com"
        }"#;
        let err = Config::from_json(raw, Path::new("config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_non_http_source_rejected() {
        let raw = r#"{
            "search_phrase": "economy",
            "category": "business",
            "months": 1,
            "source": "ftp://apnews.com"
        }"#;
        let err = Config::from_json(raw, Path::new("config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
