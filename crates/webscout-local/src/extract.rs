//! Selector-cascade page text extraction.
//!
//! The extractor degrades rather than aborts: any transport or parse failure
//! becomes a human-readable placeholder string so a single dead URL never
//! sinks the enclosing batch.

use html_scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use webscout_core::config::Messages;
use webscout_core::{Config, Error, Result};

/// Truncation marker appended when extracted text is cut at the limit.
pub const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone)]
pub struct ContentExtractor {
    client: reqwest::Client,
    selectors: Vec<Selector>,
    paragraph: Selector,
    max_content_length: usize,
    min_content_length: usize,
    fallback_paragraphs: usize,
    messages: Messages,
}

impl ContentExtractor {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.search.user_agent().to_string())
            .redirect(reqwest::redirect::Policy::limited(10))
            // Backstop against DNS/TLS stalls; the per-request timeout below
            // is the operative bound.
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_millis(cfg.search.request_timeout_ms))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        let mut selectors = Vec::new();
        for raw in &cfg.search.content_selectors {
            match Selector::parse(raw) {
                Ok(sel) => selectors.push(sel),
                Err(e) => {
                    tracing::warn!(selector = %raw, "skipping unparseable content selector: {e}")
                }
            }
        }
        let paragraph =
            Selector::parse("p").map_err(|e| Error::Parse(format!("paragraph selector: {e}")))?;

        Ok(Self {
            client,
            selectors,
            paragraph,
            max_content_length: cfg.search.max_content_length,
            min_content_length: cfg.search.min_content_length,
            fallback_paragraphs: cfg.search.fallback_paragraphs,
            messages: cfg.messages.clone(),
        })
    }

    /// Fetch a page and return a bounded plain-text excerpt.
    ///
    /// Never fails: faults come back as a placeholder embedding the error,
    /// prefixed with the matching message-catalog entry.
    pub async fn extract(&self, url: &str) -> String {
        match self.try_extract(url).await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(url, "extraction degraded to placeholder: {e}");
                format!("{}: {e}", self.messages.for_error(&e))
            }
        }
    }

    async fn try_extract(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(e.to_string())
            } else {
                Error::Network(e.to_string())
            }
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimit(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(Error::Network(format!("HTTP {status}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;
        Ok(self.extract_from_html(&body))
    }

    /// Extraction half of the pipeline, exposed for offline reuse and tests.
    pub fn extract_from_html(&self, html: &str) -> String {
        let doc = Html::parse_document(html);

        // Ordered strategy list: first selector whose match carries enough
        // text wins. A thin match (under min_content_length) falls through.
        for sel in &self.selectors {
            if let Some(el) = doc.select(sel).next() {
                let text = element_text(&el);
                if text.chars().count() >= self.min_content_length.max(1) {
                    return self.bound(text);
                }
            }
        }

        // Last resort: the first few paragraphs in document order.
        let mut parts = Vec::new();
        for p in doc.select(&self.paragraph).take(self.fallback_paragraphs) {
            let t = element_text(&p);
            if !t.is_empty() {
                parts.push(t);
            }
        }
        self.bound(parts.join(" "))
    }

    fn bound(&self, text: String) -> String {
        truncate_chars(&text, self.max_content_length)
    }
}

fn is_non_content_element(name: &str) -> bool {
    matches!(name, "script" | "style" | "noscript")
}

/// Whitespace-normalized text of an element, excluding script/style bodies.
fn element_text(el: &ElementRef) -> String {
    let mut out = String::new();
    for node in el.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let in_non_content = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .map(|e| is_non_content_element(e.name()))
                .unwrap_or(false)
        });
        if in_non_content {
            continue;
        }
        for word in text.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
    }
    out
}

/// Cut to at most `max` characters, appending the truncation marker when cut.
/// Text at or under the limit passes through unmodified.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}{}", &s[..byte_idx], TRUNCATION_MARKER),
        None => s.to_string(),
    }
}
