// tests/pipeline_e2e.rs
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};

use trend_scout::pipeline::{self, PipelineCfg};
use trend_scout::sources::{RawResult, TrendSource};
use trend_scout::store::{TrendRecord, TrendWriter};
use trend_scout::summarize::Summarizer;

struct FakeSource {
    name: &'static str,
    items: Vec<RawResult>,
    fail: bool,
}

#[async_trait]
impl TrendSource for FakeSource {
    async fn search(&self, _query: &str) -> Result<Vec<RawResult>> {
        if self.fail {
            return Err(anyhow!("simulated upstream outage"));
        }
        Ok(self.items.clone())
    }
    fn name(&self) -> &'static str {
        self.name
    }
}

struct FakeSummarizer;

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, text: &str) -> String {
        format!("Claim for: {text}")
    }
}

#[derive(Default)]
struct RecordingWriter {
    persisted: Mutex<Vec<TrendRecord>>,
}

#[async_trait]
impl TrendWriter for RecordingWriter {
    async fn persist(&self, records: &[TrendRecord]) -> usize {
        if records.is_empty() {
            return 0;
        }
        let mut g = self.persisted.lock().unwrap();
        g.extend_from_slice(records);
        records.len()
    }
}

fn days_ago(days: i64) -> String {
    (Utc::now().naive_utc() - Duration::days(days))
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

fn cfg() -> PipelineCfg {
    PipelineCfg {
        keywords: vec!["Agentic QA".to_string()],
        lookback: Duration::days(180),
        keyword_delay: std::time::Duration::ZERO,
    }
}

#[tokio::test]
async fn fresh_github_item_becomes_one_trend() {
    let sources: Vec<Box<dyn TrendSource>> = vec![Box::new(FakeSource {
        name: "GitHub",
        items: vec![RawResult {
            updated_at: days_ago(10),
            text: "A novel test orchestration framework".to_string(),
        }],
        fail: false,
    })];
    let writer = RecordingWriter::default();

    let stats = pipeline::run(&sources, &FakeSummarizer, &writer, &cfg()).await;

    let persisted = writer.persisted.lock().unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].source_tag, "GitHub");
    assert_eq!(
        persisted[0].claim,
        "Claim for: A novel test orchestration framework"
    );
    assert_eq!(stats.written, 1);
}

#[tokio::test]
async fn stale_item_is_filtered_out() {
    let sources: Vec<Box<dyn TrendSource>> = vec![Box::new(FakeSource {
        name: "GitHub",
        items: vec![RawResult {
            updated_at: days_ago(400),
            text: "A novel test orchestration framework".to_string(),
        }],
        fail: false,
    })];
    let writer = RecordingWriter::default();

    let stats = pipeline::run(&sources, &FakeSummarizer, &writer, &cfg()).await;

    assert!(writer.persisted.lock().unwrap().is_empty());
    assert_eq!(stats.skipped_stale, 1);
    assert_eq!(stats.written, 0);
}

#[tokio::test]
async fn one_failing_source_does_not_abort_the_run() {
    let sources: Vec<Box<dyn TrendSource>> = vec![
        Box::new(FakeSource {
            name: "GitHub",
            items: Vec::new(),
            fail: true,
        }),
        Box::new(FakeSource {
            name: "ArXiv",
            items: vec![RawResult {
                updated_at: days_ago(3),
                text: "An autonomous agent that repairs flaky UI tests".to_string(),
            }],
            fail: false,
        }),
    ];
    let writer = RecordingWriter::default();

    let stats = pipeline::run(&sources, &FakeSummarizer, &writer, &cfg()).await;

    let persisted = writer.persisted.lock().unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].source_tag, "ArXiv");
    assert_eq!(stats.source_errors, 1);
}

#[tokio::test]
async fn mixed_batch_keeps_only_qualifying_items() {
    let sources: Vec<Box<dyn TrendSource>> = vec![Box::new(FakeSource {
        name: "ArXiv",
        items: vec![
            RawResult {
                updated_at: days_ago(5),
                text: String::new(), // empty abstract
            },
            RawResult {
                updated_at: "garbled".to_string(),
                text: "unparseable timestamp".to_string(),
            },
            RawResult {
                updated_at: days_ago(5),
                text: "A benchmark for agentic QA systems".to_string(),
            },
        ],
        fail: false,
    })];
    let writer = RecordingWriter::default();

    let stats = pipeline::run(&sources, &FakeSummarizer, &writer, &cfg()).await;

    assert_eq!(writer.persisted.lock().unwrap().len(), 1);
    assert_eq!(stats.items, 3);
    assert_eq!(stats.skipped_empty, 1);
    assert_eq!(stats.skipped_malformed, 1);
    assert_eq!(stats.written, 1);
}
