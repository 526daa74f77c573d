// src/config.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::recency::DEFAULT_LOOKBACK_DAYS;

const ENV_KEYWORDS_PATH: &str = "SCOUT_KEYWORDS_PATH";
const DEFAULT_KEYWORDS_PATH: &str = "config/keywords.toml";

/// Built-in search terms used when no keyword file is present.
const DEFAULT_KEYWORDS: &[&str] = &["Agentic QA", "Autonomous Testing"];

/// Everything the pipeline needs, read once at startup. Missing required
/// values are fatal before any pipeline work starts.
#[derive(Debug, Clone)]
pub struct Settings {
    pub supabase_url: String,
    pub supabase_key: String,
    pub google_api_key: String,
    pub keywords: Vec<String>,
    pub lookback_days: i64,
    pub keyword_delay_secs: u64,
    pub max_results: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let supabase_url = require_env("PROJECT_URL")?;
        let supabase_key = require_env("PUBLISHABLE_API_KEY")?;
        let google_api_key = require_env("GOOGLE_API_KEY")?;

        Ok(Self {
            supabase_url,
            supabase_key,
            google_api_key,
            keywords: load_keywords_default()?,
            lookback_days: env_parsed("SCOUT_LOOKBACK_DAYS", DEFAULT_LOOKBACK_DAYS)?,
            keyword_delay_secs: env_parsed("SCOUT_KEYWORD_DELAY_SECS", 2)?,
            max_results: env_parsed("SCOUT_MAX_RESULTS", 20)?,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| anyhow!("missing required environment variable {name}"))
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(v) => v.parse().with_context(|| format!("parsing {name}")),
        Err(_) => Ok(default),
    }
}

/// Load keywords from an explicit TOML file: `keywords = ["...", ...]`.
pub fn load_keywords_from(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading keywords from {}", path.display()))?;
    parse_keywords(&content)
}

/// Load keywords using env var + fallbacks:
/// 1) $SCOUT_KEYWORDS_PATH
/// 2) config/keywords.toml
/// 3) built-in defaults
pub fn load_keywords_default() -> Result<Vec<String>> {
    if let Ok(p) = std::env::var(ENV_KEYWORDS_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_keywords_from(&pb);
        }
        return Err(anyhow!("SCOUT_KEYWORDS_PATH points to non-existent path"));
    }
    let default_p = PathBuf::from(DEFAULT_KEYWORDS_PATH);
    if default_p.exists() {
        return load_keywords_from(&default_p);
    }
    Ok(DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect())
}

fn parse_keywords(s: &str) -> Result<Vec<String>> {
    #[derive(serde::Deserialize)]
    struct KeywordsFile {
        keywords: Vec<String>,
    }
    let v: KeywordsFile = toml::from_str(s).context("parsing keywords toml")?;
    let cleaned: Vec<String> = v
        .keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    if cleaned.is_empty() {
        return Err(anyhow!("keywords file contains no usable keywords"));
    }
    Ok(cleaned)
}
