//! Summarizer: turns a project description or paper abstract into a
//! one-sentence claim via a single Gemini completion call.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-pro";

/// Returned when the completion call fails for any reason. The pipeline
/// never aborts because one summarization failed; the record keeps its
/// shape with this placeholder claim.
pub const SENTINEL_CLAIM: &str = "USP could not be determined.";

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a one-sentence claim for `text`. Infallible by contract:
    /// implementations substitute a sentinel on failure.
    async fn summarize(&self, text: &str) -> String;
}

/// Gemini-backed summarizer. One `generateContent` request per call,
/// no retry, no caching.
pub struct GeminiSummarizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiSummarizer {
    /// `model_override`: pass Some("gemini-2.0-flash") to override the default.
    pub fn new(client: reqwest::Client, api_key: String, model_override: Option<&str>) -> Self {
        Self {
            client,
            api_key,
            model: model_override.unwrap_or(DEFAULT_MODEL).to_string(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Point the summarizer at a different endpoint (tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn prompt(text: &str) -> String {
        format!(
            "Analyze the following text from a project's README or abstract.\n\
             Extract the Unique Selling Proposition (USP) in a single, concise sentence.\n\
             The USP should highlight what makes this project novel or powerful.\n\n\
             Text:\n---\n{text}\n---\n\nUSP:"
        )
    }

    async fn fetch_claim(&self, text: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Part<'a> {
            text: &'a str,
        }
        #[derive(Serialize)]
        struct Content<'a> {
            parts: Vec<Part<'a>>,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            contents: Vec<Content<'a>>,
        }
        #[derive(Deserialize)]
        struct Resp {
            #[serde(default)]
            candidates: Vec<Candidate>,
        }
        #[derive(Deserialize)]
        struct Candidate {
            content: RespContent,
        }
        #[derive(Deserialize)]
        struct RespContent {
            #[serde(default)]
            parts: Vec<RespPart>,
        }
        #[derive(Deserialize)]
        struct RespPart {
            text: String,
        }

        let prompt = Self::prompt(text);
        let req = Req {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&req)
            .send()
            .await
            .context("gemini request")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("gemini returned {status}"));
        }

        let body: Resp = resp.json().await.context("gemini response body")?;
        let claim = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("gemini response had no text candidate"))?;
        Ok(claim)
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, text: &str) -> String {
        match self.fetch_claim(text).await {
            Ok(claim) => claim,
            Err(e) => {
                tracing::warn!(error = ?e, "summarization failed, using sentinel");
                SENTINEL_CLAIM.to_string()
            }
        }
    }
}
