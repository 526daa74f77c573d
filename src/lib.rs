// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod pipeline;
pub mod recency;
pub mod sources;
pub mod store;
pub mod summarize;

// ---- Re-exports for stable public API ----
pub use crate::pipeline::{run, PipelineCfg, RunStats};
pub use crate::sources::{RawResult, TrendSource};
pub use crate::store::{TrendRecord, TrendWriter};
pub use crate::summarize::{Summarizer, SENTINEL_CLAIM};
