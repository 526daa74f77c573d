use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::sources::{normalize_text, RawResult, TrendSource};

const GITHUB_API_URL: &str = "https://api.github.com/search/repositories";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Repo>,
}

#[derive(Debug, Deserialize)]
struct Repo {
    pushed_at: Option<String>,
    description: Option<String>,
}

/// GitHub repository search, newest pushes first.
pub struct GithubSource {
    client: reqwest::Client,
    base_url: String,
}

impl GithubSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: GITHUB_API_URL.to_string(),
        }
    }

    /// Point the source at a different endpoint (tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn to_raw(items: Vec<Repo>) -> Vec<RawResult> {
        items
            .into_iter()
            .filter_map(|r| {
                let updated_at = r.pushed_at?;
                Some(RawResult {
                    updated_at,
                    text: normalize_text(r.description.as_deref().unwrap_or_default()),
                })
            })
            .collect()
    }
}

#[async_trait]
impl TrendSource for GithubSource {
    async fn search(&self, query: &str) -> Result<Vec<RawResult>> {
        let resp = self
            .client
            .get(&self.base_url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", "trend-scout/0.1")
            .query(&[("q", query), ("sort", "updated"), ("order", "desc")])
            .send()
            .await
            .context("github search request")?;

        if !resp.status().is_success() {
            tracing::warn!(status = %resp.status(), query, "github search failed");
            return Ok(Vec::new());
        }

        let body: SearchResponse = resp.json().await.context("github search body")?;
        Ok(Self::to_raw(body.items))
    }

    fn name(&self) -> &'static str {
        "GitHub"
    }
}
