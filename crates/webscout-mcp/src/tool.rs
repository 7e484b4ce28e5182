//! The search orchestrator: one query in, one envelope out.
//!
//! Composes the candidate lister and the content extractor, owns the
//! per-category query shaping and the inter-request pacing policy, and is
//! the boundary where internal faults become error envelopes.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use webscout_core::config::CategoryProfile;
use webscout_core::{Config, Envelope, Result, SearchBackend, SearchHit, TimeRange};
use webscout_local::{ContentExtractor, StaticSearchBackend};

/// Search category; selects the shaping profile from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    General,
    News,
    Tech,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::News => "news",
            Self::Tech => "tech",
        }
    }
}

pub struct SearchTool {
    config: Arc<Config>,
    backend: Arc<dyn SearchBackend>,
    extractor: ContentExtractor,
}

impl SearchTool {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let backend = Arc::new(StaticSearchBackend::new());
        Self::with_backend(config, backend)
    }

    /// Constructor with an injected backend: the substitution seam for a
    /// real engine, and the hook the tests use for fixture servers.
    pub fn with_backend(config: Arc<Config>, backend: Arc<dyn SearchBackend>) -> Result<Self> {
        let extractor = ContentExtractor::new(&config)?;
        Ok(Self {
            config,
            backend,
            extractor,
        })
    }

    fn profile(&self, category: Category) -> &CategoryProfile {
        match category {
            Category::General => &self.config.categories.web,
            Category::News => &self.config.categories.news,
            Category::Tech => &self.config.categories.tech,
        }
    }

    /// General web search; the caller's `time_range` is honored.
    pub async fn search_web(
        &self,
        query: &str,
        num_results: Option<usize>,
        time_range: Option<TimeRange>,
    ) -> Envelope {
        self.run(query, num_results, time_range, Category::General)
            .await
    }

    /// News search: news-intent terms appended, recency forced to `day`.
    pub async fn search_news(&self, query: &str, num_results: Option<usize>) -> Envelope {
        self.run(query, num_results, None, Category::News).await
    }

    /// Technical search: tech-intent terms appended, recency forced to `week`.
    pub async fn search_tech(&self, query: &str, num_results: Option<usize>) -> Envelope {
        self.run(query, num_results, None, Category::Tech).await
    }

    /// The full pipeline. Internal faults never propagate: anything the
    /// lister (or an unexpected extractor path) reports is converted into
    /// the error envelope here.
    pub async fn run(
        &self,
        query: &str,
        num_results: Option<usize>,
        time_range: Option<TimeRange>,
        category: Category,
    ) -> Envelope {
        let profile = self.profile(category);
        let shaped = shape_query(query, &profile.query_suffix);
        let range = profile
            .time_range
            .or(time_range)
            .unwrap_or(self.config.search.default_time_range);
        let count = self
            .config
            .search
            .clamp_num_results(Some(num_results.unwrap_or(profile.default_num_results)));

        tracing::info!(
            category = category.as_str(),
            query = %shaped,
            count,
            time_range = %range,
            "running search pipeline"
        );

        match self.enrich(&shaped, count, range).await {
            Ok(hits) => Envelope::success(shaped, hits),
            Err(e) => {
                tracing::warn!(query = %shaped, "search pipeline failed: {e}");
                Envelope::error(shaped, e)
            }
        }
    }

    async fn enrich(
        &self,
        query: &str,
        count: usize,
        range: TimeRange,
    ) -> Result<Vec<SearchHit>> {
        let candidates = self.backend.list(query, count, range).await?;
        let delay = Duration::from_millis(self.config.search.request_delay_ms);

        // Strictly sequential, candidate order preserved; the pause between
        // fetches respects downstream rate limits.
        let mut hits = Vec::with_capacity(candidates.len());
        for (i, c) in candidates.into_iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let content = self.extractor.extract(&c.url).await;
            tracing::debug!(url = %c.url, chars = content.chars().count(), "candidate enriched");
            hits.push(SearchHit {
                title: c.title,
                url: c.url,
                snippet: c.snippet,
                content,
                timestamp: Utc::now(),
            });
        }
        Ok(hits)
    }
}

fn shape_query(query: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        query.to_string()
    } else if query.is_empty() {
        suffix.to_string()
    } else {
        format!("{query} {suffix}")
    }
}
