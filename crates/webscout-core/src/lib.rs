use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod config;

pub use config::Config;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("content parse failed: {0}")]
    Parse(String),
    #[error("search backend failed: {0}")]
    Search(String),
    #[error("rate limited: {0}")]
    RateLimit(String),
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Recency window for a search request.
///
/// The long names are the canonical wire form; the single-letter aliases are
/// accepted on input for compatibility with older callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[serde(alias = "d")]
    Day,
    #[serde(alias = "w")]
    Week,
    #[serde(alias = "m")]
    Month,
    #[serde(alias = "y")]
    Year,
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::Day
    }
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "d" => Some(Self::Day),
            "week" | "w" => Some(Self::Week),
            "month" | "m" => Some(Self::Month),
            "year" | "y" => Some(Self::Year),
            _ => None,
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unenriched search hit: what a backend returns before any page fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// A candidate enriched with extracted page text and a capture instant.
///
/// `content` holds a human-readable placeholder when extraction failed;
/// extraction failure never removes a hit from the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// The uniform success/error wrapper returned by every search operation.
///
/// `status` fully determines which other fields are present, so callers can
/// branch on it alone. `num_results` always equals `results.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope {
    Success {
        query: String,
        num_results: usize,
        results: Vec<SearchHit>,
        timestamp: DateTime<Utc>,
    },
    Error {
        message: String,
        query: String,
        timestamp: DateTime<Utc>,
    },
}

impl Envelope {
    pub fn success(query: impl Into<String>, results: Vec<SearchHit>) -> Self {
        Self::Success {
            query: query.into(),
            num_results: results.len(),
            results,
            timestamp: Utc::now(),
        }
    }

    pub fn error(query: impl Into<String>, message: impl ToString) -> Self {
        Self::Error {
            message: message.to_string(),
            query: query.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            // Envelope fields are all plain serializable types, so this path
            // should be unreachable; keep the contract (never panic) anyway.
            serde_json::json!({
                "status": "error",
                "message": format!("envelope serialization failed: {e}"),
                "query": "",
                "timestamp": Utc::now(),
            })
        })
    }
}

/// The substitution seam for a real search engine.
///
/// Contract: ordered candidates, `len() <= count`, and zero matches is an
/// empty vec, not an error. `time_range` is a hint; backends may ignore it.
#[async_trait::async_trait]
pub trait SearchBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn list(
        &self,
        query: &str,
        count: usize,
        time_range: TimeRange,
    ) -> Result<Vec<Candidate>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_range_accepts_short_aliases() {
        assert_eq!(TimeRange::parse("d"), Some(TimeRange::Day));
        assert_eq!(TimeRange::parse("WEEK"), Some(TimeRange::Week));
        assert_eq!(TimeRange::parse("m"), Some(TimeRange::Month));
        assert_eq!(TimeRange::parse("y"), Some(TimeRange::Year));
        assert_eq!(TimeRange::parse("fortnight"), None);

        let tr: TimeRange = serde_json::from_str("\"w\"").unwrap();
        assert_eq!(tr, TimeRange::Week);
        assert_eq!(serde_json::to_string(&tr).unwrap(), "\"week\"");
    }

    #[test]
    fn success_envelope_counts_results() {
        let hit = SearchHit {
            title: "t".to_string(),
            url: "https://example.com/".to_string(),
            snippet: "s".to_string(),
            content: "c".to_string(),
            timestamp: Utc::now(),
        };
        let env = Envelope::success("q", vec![hit.clone(), hit]);
        let v = env.to_value();
        assert_eq!(v["status"], "success");
        assert_eq!(v["num_results"], 2);
        assert_eq!(v["results"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn error_envelope_has_no_results_field() {
        let v = Envelope::error("q", "boom").to_value();
        assert_eq!(v["status"], "error");
        assert_eq!(v["message"], "boom");
        assert_eq!(v["query"], "q");
        assert!(v.get("results").is_none());
        assert!(v.get("num_results").is_none());
    }

    #[test]
    fn envelope_round_trips_non_ascii_unescaped() {
        let env = Envelope::error("科技新闻", "网络连接错误");
        let s = serde_json::to_string(&env.to_value()).unwrap();
        // serde_json writes UTF-8 directly rather than \u escapes.
        assert!(s.contains("科技新闻"));
        assert!(s.contains("网络连接错误"));
    }
}
