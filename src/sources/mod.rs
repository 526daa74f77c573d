// src/sources/mod.rs
pub mod arxiv;
pub mod github;

use anyhow::Result;

/// One search hit from an upstream, normalized to the two fields the
/// pipeline cares about. Lives only for the duration of one keyword iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResult {
    /// Last-updated (GitHub `pushed_at`) or published (arXiv `updated`)
    /// timestamp, as the upstream produced it.
    pub updated_at: String,
    /// Description or abstract; may be empty.
    pub text: String,
}

/// A searchable upstream. Implementations own their HTTP specifics; the
/// pipeline only sees this seam, so tests substitute fakes.
#[async_trait::async_trait]
pub trait TrendSource: Send + Sync {
    /// Run one search for `query`. Non-2xx responses are a per-source
    /// condition handled inside the implementation (warn + empty vec);
    /// an `Err` here means the request itself could not complete.
    async fn search(&self, query: &str) -> Result<Vec<RawResult>>;
    fn name(&self) -> &'static str;
}

/// Normalize text: decode HTML entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}
