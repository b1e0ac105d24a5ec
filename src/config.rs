//! Run configuration derived from environment variables.
//!
//! All keys are optional with defaults. The configuration is parsed once
//! at startup into an immutable struct that is passed explicitly into the
//! loader, aggregator, and serializer; nothing reads the environment
//! after this point.

use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} (expected an integer)")]
    InvalidInteger { key: &'static str, value: String },
}

/// Immutable run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries in the output feed (`MAX_ITEMS`).
    pub max_items: usize,

    /// Lowercased keyword filter set (`KEYWORDS`, comma-separated).
    /// Empty means no keyword filtering.
    pub keywords: Vec<String>,

    /// Recency threshold in days (`SINCE_DAYS`). 0 disables the filter.
    pub since_days: i64,

    /// Feed-level title (`FEED_TITLE`).
    pub feed_title: String,

    /// Feed-level author name (`FEED_AUTHOR_NAME`), also the fallback
    /// author for entries without one.
    pub author_name: String,

    /// Self-reference URL of the generated feed (`REPO_PAGES_URL`).
    pub self_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_items: 100,
            keywords: Vec::new(),
            since_days: 0,
            feed_title: "Personal Aggregated Feed".to_string(),
            author_name: "Mario Fontana".to_string(),
            self_url: "https://example.com/feed.xml".to_string(),
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from any key/value lookup.
    ///
    /// Missing keys fall back to defaults. A present but malformed
    /// integer is a fatal configuration error; the run aborts before any
    /// fetching starts.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("MAX_ITEMS") {
            config.max_items = parse_int("MAX_ITEMS", &value)?;
        }
        if let Some(value) = lookup("KEYWORDS") {
            config.keywords = value
                .split(',')
                .map(|kw| kw.trim().to_lowercase())
                .filter(|kw| !kw.is_empty())
                .collect();
        }
        if let Some(value) = lookup("SINCE_DAYS") {
            config.since_days = parse_int("SINCE_DAYS", &value)?;
        }
        if let Some(value) = lookup("FEED_TITLE") {
            config.feed_title = value;
        }
        if let Some(value) = lookup("FEED_AUTHOR_NAME") {
            config.author_name = value;
        }
        if let Some(value) = lookup("REPO_PAGES_URL") {
            config.self_url = value;
        }

        Ok(config)
    }
}

fn parse_int<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidInteger {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_map(&[]).unwrap();
        assert_eq!(config.max_items, 100);
        assert!(config.keywords.is_empty());
        assert_eq!(config.since_days, 0);
        assert_eq!(config.feed_title, "Personal Aggregated Feed");
        assert_eq!(config.author_name, "Mario Fontana");
        assert_eq!(config.self_url, "https://example.com/feed.xml");
    }

    #[test]
    fn test_keywords_trimmed_lowercased_and_filtered() {
        let config = from_map(&[("KEYWORDS", " Rust , ,ASYNC,  ")]).unwrap();
        assert_eq!(config.keywords, vec!["rust", "async"]);
    }

    #[test]
    fn test_empty_keywords_means_no_filtering() {
        let config = from_map(&[("KEYWORDS", "")]).unwrap();
        assert!(config.keywords.is_empty());
    }

    #[test]
    fn test_integer_overrides() {
        let config = from_map(&[("MAX_ITEMS", "25"), ("SINCE_DAYS", "14")]).unwrap();
        assert_eq!(config.max_items, 25);
        assert_eq!(config.since_days, 14);
    }

    #[test]
    fn test_integer_with_surrounding_whitespace() {
        let config = from_map(&[("MAX_ITEMS", " 42 ")]).unwrap();
        assert_eq!(config.max_items, 42);
    }

    #[test]
    fn test_malformed_integer_is_fatal() {
        let err = from_map(&[("MAX_ITEMS", "many")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidInteger { key: "MAX_ITEMS", .. }
        ));
        assert!(err.to_string().contains("MAX_ITEMS"));
    }

    #[test]
    fn test_string_overrides() {
        let config = from_map(&[
            ("FEED_TITLE", "Robotics Digest"),
            ("FEED_AUTHOR_NAME", "Ada"),
            ("REPO_PAGES_URL", "https://ada.dev/feed.xml"),
        ])
        .unwrap();
        assert_eq!(config.feed_title, "Robotics Digest");
        assert_eq!(config.author_name, "Ada");
        assert_eq!(config.self_url, "https://ada.dev/feed.xml");
    }
}
