use anyhow::{Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::sources::{normalize_text, RawResult, TrendSource};

const ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    updated: Option<String>,
    summary: Option<String>,
}

/// arXiv preprint search over the Atom export API, most recently
/// updated papers first.
pub struct ArxivSource {
    client: reqwest::Client,
    base_url: String,
    max_results: u32,
}

impl ArxivSource {
    pub fn new(client: reqwest::Client, max_results: u32) -> Self {
        Self {
            client,
            base_url: ARXIV_API_URL.to_string(),
            max_results,
        }
    }

    /// Point the source at a different endpoint (tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Parse an Atom feed body. Entries missing `updated` or `summary` are
    /// dropped; a body that is not a feed at all yields an empty list. One
    /// malformed record must never abort the batch.
    pub fn parse_feed(body: &str) -> Vec<RawResult> {
        let feed: Feed = match from_str(body) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(error = ?e, "arxiv feed did not parse");
                return Vec::new();
            }
        };

        feed.entries
            .into_iter()
            .filter_map(|e| {
                let updated_at = e.updated?;
                let summary = e.summary?;
                Some(RawResult {
                    updated_at,
                    text: normalize_text(&summary),
                })
            })
            .collect()
    }
}

#[async_trait]
impl TrendSource for ArxivSource {
    async fn search(&self, query: &str) -> Result<Vec<RawResult>> {
        let search_query = format!("all:\"{query}\"");
        let max_results = self.max_results.to_string();
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "lastUpdatedDate"),
                ("sortOrder", "descending"),
            ])
            .send()
            .await
            .context("arxiv query request")?;

        if !resp.status().is_success() {
            tracing::warn!(status = %resp.status(), query, "arxiv query failed");
            return Ok(Vec::new());
        }

        let body = resp.text().await.context("arxiv query body")?;
        Ok(Self::parse_feed(&body))
    }

    fn name(&self) -> &'static str {
        "ArXiv"
    }
}
