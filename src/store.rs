//! Durable store: the `Trend` table behind Supabase's PostgREST endpoint.
//! Insert-only access; every persist call is a pure append.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The unit persisted. Serialized field names match the store's columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendRecord {
    /// One-sentence claim produced by the summarizer.
    #[serde(rename = "market_sentiment")]
    pub claim: String,
    /// Which upstream produced the item, e.g. "GitHub", "ArXiv".
    #[serde(rename = "tech_stack_flags")]
    pub source_tag: String,
    /// Timestamp of the pipeline run, not of the source item. RFC 3339.
    pub created_at: String,
}

#[async_trait]
pub trait TrendWriter: Send + Sync {
    /// Persist a batch. Returns the number of records written; failures are
    /// handled inside the implementation and reported as 0 so one lost batch
    /// never affects the others.
    async fn persist(&self, records: &[TrendRecord]) -> usize;
}

/// Writes batches to `<base_url>/rest/v1/Trend` in a single POST.
pub struct SupabaseWriter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseWriter {
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn insert_batch(&self, records: &[TrendRecord]) -> Result<()> {
        let url = format!("{}/rest/v1/Trend", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(records)
            .send()
            .await
            .context("trend insert request")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("trend insert returned {status}"));
        }
        Ok(())
    }
}

#[async_trait]
impl TrendWriter for SupabaseWriter {
    async fn persist(&self, records: &[TrendRecord]) -> usize {
        if records.is_empty() {
            return 0;
        }
        match self.insert_batch(records).await {
            Ok(()) => records.len(),
            Err(e) => {
                tracing::warn!(error = ?e, batch = records.len(), "trend insert failed");
                0
            }
        }
    }
}
