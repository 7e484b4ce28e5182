//! Deterministic stand-in search backend.
//!
//! This is the seam where a real engine (API client, crawler index) plugs in:
//! anything implementing [`SearchBackend`] can replace it without touching
//! the orchestrator, dispatch layer, or envelope contracts.

use webscout_core::{Candidate, Result, SearchBackend, TimeRange};

/// Quote-plus encoding for URL path/query fragments built from a query.
fn quote_plus(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// Produces a fixed trio of templated candidates derived from the query:
/// a news-style hit, an encyclopedia-style hit, and an analysis-style hit,
/// truncated to the requested count. `time_range` is accepted but does not
/// change the output here; a live backend would wire it through.
#[derive(Debug, Clone, Default)]
pub struct StaticSearchBackend;

impl StaticSearchBackend {
    pub fn new() -> Self {
        Self
    }

    fn candidates_for(query: &str) -> Vec<Candidate> {
        let enc = quote_plus(query);
        vec![
            Candidate {
                title: format!("Latest coverage: \"{query}\""),
                url: format!("https://news.example.com/{enc}"),
                snippet: format!("Recent reporting and updates on {query}..."),
            },
            Candidate {
                title: format!("{query} - Encyclopedia"),
                url: format!("https://encyclopedia.example.com/wiki/{enc}"),
                snippet: format!("Definition, history and latest developments of {query}..."),
            },
            Candidate {
                title: format!("In depth: the state of {query}"),
                url: format!("https://research.example.com/analysis/{enc}"),
                snippet: format!("Expert analysis of current trends and outlook for {query}..."),
            },
        ]
    }
}

#[async_trait::async_trait]
impl SearchBackend for StaticSearchBackend {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn list(
        &self,
        query: &str,
        count: usize,
        _time_range: TimeRange,
    ) -> Result<Vec<Candidate>> {
        let mut out = Self::candidates_for(query);
        out.truncate(count);
        Ok(out)
    }
}
