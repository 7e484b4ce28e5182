//! Process-wide configuration.
//!
//! Constructed once at startup and passed by handle into each component.
//! Mutation goes through [`Config::update`], keyed by section name; updates
//! are not safe concurrently with in-flight requests and are expected only
//! during initialization.

use crate::{Error, Result, TimeRange};
use serde::{Deserialize, Serialize};

/// Numeric limits, selector strategy and request shaping for the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_num_results: usize,
    pub max_num_results: usize,
    pub default_time_range: TimeRange,
    /// Per-fetch timeout for content extraction.
    pub request_timeout_ms: u64,
    /// Fixed pause between successive extraction fetches.
    pub request_delay_ms: u64,
    /// Ordered content-region strategies, probed first-match-wins.
    pub content_selectors: Vec<String>,
    pub max_content_length: usize,
    /// A selector match shorter than this falls through to the next strategy.
    /// The default of 1 accepts any non-empty match; raise it to skip
    /// boilerplate-only regions.
    pub min_content_length: usize,
    /// How many paragraph elements the last-resort fallback concatenates.
    pub fallback_paragraphs: usize,
    /// Browser-like identification headers; the extractor uses the first.
    pub user_agents: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_num_results: 10,
            max_num_results: 50,
            default_time_range: TimeRange::Day,
            request_timeout_ms: 10_000,
            request_delay_ms: 500,
            content_selectors: [
                "article",
                "main",
                ".content",
                ".article-content",
                ".post-content",
                "#content",
                ".entry-content",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            max_content_length: 2_000,
            min_content_length: 1,
            fallback_paragraphs: 5,
            user_agents: [
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl SearchConfig {
    /// Clamp a requested result count into `[1, max_num_results]`.
    pub fn clamp_num_results(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_num_results)
            .clamp(1, self.max_num_results.max(1))
    }

    pub fn user_agent(&self) -> &str {
        self.user_agents
            .first()
            .map(String::as_str)
            .unwrap_or("webscout/0.1")
    }
}

/// Query shaping for one search category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryProfile {
    pub description: String,
    /// Appended to the caller's query; empty means pass-through.
    pub query_suffix: String,
    /// Forced recency window; `None` keeps the caller's `time_range`.
    pub time_range: Option<TimeRange>,
    pub default_num_results: usize,
}

impl Default for CategoryProfile {
    fn default() -> Self {
        Self {
            description: String::new(),
            query_suffix: String::new(),
            time_range: None,
            default_num_results: 10,
        }
    }
}

/// The fixed category table: general web, news, tech, plus an academic
/// profile that exists in configuration but is not exposed as an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Categories {
    pub web: CategoryProfile,
    pub news: CategoryProfile,
    pub tech: CategoryProfile,
    pub academic: CategoryProfile,
}

impl Default for Categories {
    fn default() -> Self {
        Self {
            web: CategoryProfile {
                description: "general web search".to_string(),
                query_suffix: String::new(),
                time_range: None,
                default_num_results: 10,
            },
            news: CategoryProfile {
                description: "news search".to_string(),
                query_suffix: "news latest coverage".to_string(),
                time_range: Some(TimeRange::Day),
                default_num_results: 5,
            },
            tech: CategoryProfile {
                description: "technical content search".to_string(),
                query_suffix: "technology development tutorial".to_string(),
                time_range: Some(TimeRange::Week),
                default_num_results: 5,
            },
            academic: CategoryProfile {
                description: "academic search".to_string(),
                query_suffix: "paper research study".to_string(),
                time_range: Some(TimeRange::Month),
                default_num_results: 5,
            },
        }
    }
}

/// Cache knobs. Reserved: nothing implements storage or eviction yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_s: u64,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_s: 3_600,
            max_entries: 1_000,
        }
    }
}

/// Human-readable message catalog keyed by error category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub network_error: String,
    pub timeout_error: String,
    pub parse_error: String,
    pub api_error: String,
    pub rate_limit_error: String,
    pub invalid_query: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            network_error: "network connection failed".to_string(),
            timeout_error: "request timed out, try again later".to_string(),
            parse_error: "content parsing failed".to_string(),
            api_error: "search API error".to_string(),
            rate_limit_error: "request rate too high, try again later".to_string(),
            invalid_query: "invalid search query".to_string(),
        }
    }
}

impl Messages {
    /// Catalog entry for an error, used as the placeholder prefix when
    /// extraction degrades instead of aborting.
    pub fn for_error(&self, err: &Error) -> &str {
        match err {
            Error::Network(_) => &self.network_error,
            Error::Timeout(_) => &self.timeout_error,
            Error::Parse(_) => &self.parse_error,
            Error::Search(_) => &self.api_error,
            Error::RateLimit(_) => &self.rate_limit_error,
            Error::InvalidParams(_) => &self.invalid_query,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub categories: Categories,
    pub cache: CacheConfig,
    pub messages: Messages,
    pub logging: LoggingConfig,
}

impl Config {
    /// Defaults with `WEBSCOUT_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `from_env` with the variable source injected, so override parsing
    /// stays independent of process state.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let get_u64 = |key: &str| get(key).and_then(|s| s.parse::<u64>().ok());
        let get_usize = |key: &str| get(key).and_then(|s| s.parse::<usize>().ok());

        let mut cfg = Self::default();
        if let Some(v) = get_u64("WEBSCOUT_REQUEST_TIMEOUT_MS") {
            cfg.search.request_timeout_ms = v;
        }
        if let Some(v) = get_u64("WEBSCOUT_REQUEST_DELAY_MS") {
            cfg.search.request_delay_ms = v;
        }
        if let Some(v) = get_usize("WEBSCOUT_MAX_CONTENT_LENGTH") {
            cfg.search.max_content_length = v;
        }
        if let Some(v) = get_usize("WEBSCOUT_MAX_NUM_RESULTS") {
            cfg.search.max_num_results = v;
        }
        if let Some(v) = get("WEBSCOUT_LOG") {
            cfg.logging.level = v;
        }
        cfg
    }

    /// Replace one named section from a JSON value.
    ///
    /// Unknown sections and shape mismatches are rejected; the previous
    /// section value is kept on failure.
    pub fn update(&mut self, section: &str, value: serde_json::Value) -> Result<()> {
        fn parse<T: serde::de::DeserializeOwned>(
            section: &str,
            value: serde_json::Value,
        ) -> Result<T> {
            serde_json::from_value(value)
                .map_err(|e| Error::InvalidParams(format!("bad {section} section: {e}")))
        }

        match section {
            "search" => self.search = parse(section, value)?,
            "categories" => self.categories = parse(section, value)?,
            "cache" => self.cache = parse(section, value)?,
            "messages" => self.messages = parse(section, value)?,
            "logging" => self.logging = parse(section, value)?,
            other => {
                return Err(Error::InvalidParams(format!(
                    "unknown configuration section: {other}"
                )))
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> bool {
        self.search.default_num_results >= 1
            && self.search.max_num_results >= self.search.default_num_results
            && self.search.request_timeout_ms > 0
            && self.search.max_content_length > 0
            && !self.search.content_selectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.validate());
        assert_eq!(cfg.search.default_num_results, 10);
        assert_eq!(cfg.search.max_num_results, 50);
        assert_eq!(cfg.search.content_selectors[0], "article");
        assert_eq!(cfg.categories.news.time_range, Some(TimeRange::Day));
        assert_eq!(cfg.categories.tech.time_range, Some(TimeRange::Week));
    }

    #[test]
    fn clamp_respects_floor_and_ceiling() {
        let cfg = SearchConfig::default();
        assert_eq!(cfg.clamp_num_results(None), 10);
        assert_eq!(cfg.clamp_num_results(Some(0)), 1);
        assert_eq!(cfg.clamp_num_results(Some(7)), 7);
        assert_eq!(cfg.clamp_num_results(Some(500)), 50);
    }

    #[test]
    fn update_replaces_named_section_only() {
        let mut cfg = Config::default();
        cfg.update(
            "search",
            serde_json::json!({ "max_content_length": 64, "request_delay_ms": 0 }),
        )
        .unwrap();
        assert_eq!(cfg.search.max_content_length, 64);
        assert_eq!(cfg.search.request_delay_ms, 0);
        // Fields omitted from the update keep their defaults (serde(default)).
        assert_eq!(cfg.search.max_num_results, 50);
        // Other sections untouched.
        assert_eq!(cfg.cache.ttl_s, 3_600);
    }

    #[test]
    fn update_rejects_unknown_section_and_bad_shape() {
        let mut cfg = Config::default();
        let err = cfg
            .update("turbo", serde_json::json!({}))
            .unwrap_err()
            .to_string();
        assert!(err.contains("turbo"), "{err}");

        let before = cfg.search.max_content_length;
        assert!(cfg
            .update("search", serde_json::json!({ "max_content_length": "lots" }))
            .is_err());
        assert_eq!(cfg.search.max_content_length, before);
    }

    #[test]
    fn lookup_overrides_apply_and_garbage_is_ignored() {
        let cfg = Config::from_lookup(|key| match key {
            "WEBSCOUT_REQUEST_TIMEOUT_MS" => Some("2500".to_string()),
            "WEBSCOUT_MAX_CONTENT_LENGTH" => Some(" 300 ".to_string()),
            "WEBSCOUT_MAX_NUM_RESULTS" => Some("not a number".to_string()),
            "WEBSCOUT_LOG" => Some("debug".to_string()),
            _ => None,
        });
        assert_eq!(cfg.search.request_timeout_ms, 2_500);
        assert_eq!(cfg.search.max_content_length, 300);
        // Unparseable and unset variables leave the defaults in place.
        assert_eq!(cfg.search.max_num_results, 50);
        assert_eq!(cfg.search.request_delay_ms, 500);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn validate_rejects_inverted_limits() {
        let mut cfg = Config::default();
        cfg.search.max_num_results = 3;
        assert!(!cfg.validate());
    }
}
