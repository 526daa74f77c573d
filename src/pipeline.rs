// src/pipeline.rs
use chrono::{Duration, NaiveDateTime, Utc};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

use crate::recency::is_recent;
use crate::sources::{RawResult, TrendSource};
use crate::store::{TrendRecord, TrendWriter};
use crate::summarize::Summarizer;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("scout_items_total", "Search results seen across sources.");
        describe_counter!(
            "scout_skipped_empty_total",
            "Items dropped for empty text content."
        );
        describe_counter!(
            "scout_skipped_stale_total",
            "Items dropped for falling outside the lookback window."
        );
        describe_counter!(
            "scout_skipped_malformed_total",
            "Items dropped for unparseable timestamps."
        );
        describe_counter!("scout_source_errors_total", "Source search failures.");
        describe_counter!("scout_trends_written_total", "Trend records persisted.");
    });
}

#[derive(Debug, Clone)]
pub struct PipelineCfg {
    pub keywords: Vec<String>,
    pub lookback: Duration,
    pub keyword_delay: std::time::Duration,
}

/// Tallies for one full run, logged at the end.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub items: usize,
    pub skipped_empty: usize,
    pub skipped_stale: usize,
    pub skipped_malformed: usize,
    pub source_errors: usize,
    pub written: usize,
}

/// Turn one batch of search results into persistable trend records:
/// drop empty-text items, drop items outside the lookback window, skip
/// items whose timestamp does not parse, summarize the rest.
pub async fn build_records(
    now: NaiveDateTime,
    source_tag: &str,
    items: Vec<RawResult>,
    summarizer: &dyn Summarizer,
    lookback: Duration,
    stats: &mut RunStats,
) -> Vec<TrendRecord> {
    let created_at = now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
    let mut records = Vec::new();

    for item in items {
        stats.items += 1;
        counter!("scout_items_total").increment(1);

        if item.text.is_empty() {
            stats.skipped_empty += 1;
            counter!("scout_skipped_empty_total").increment(1);
            continue;
        }

        match is_recent(&item.updated_at, now, lookback) {
            Ok(true) => {}
            Ok(false) => {
                stats.skipped_stale += 1;
                counter!("scout_skipped_stale_total").increment(1);
                continue;
            }
            Err(e) => {
                tracing::warn!(error = %e, source = source_tag, "skipping item");
                stats.skipped_malformed += 1;
                counter!("scout_skipped_malformed_total").increment(1);
                continue;
            }
        }

        let claim = summarizer.summarize(&item.text).await;
        records.push(TrendRecord {
            claim,
            source_tag: source_tag.to_string(),
            created_at: created_at.clone(),
        });
    }

    records
}

/// Run the whole pipeline once: keywords × sources, strictly sequential,
/// with a fixed delay between keyword iterations. Only startup configuration
/// can fail a run; every per-source, per-item, and per-batch error has been
/// converted to a skip or a sentinel by the time it reaches this loop.
pub async fn run(
    sources: &[Box<dyn TrendSource>],
    summarizer: &dyn Summarizer,
    writer: &dyn TrendWriter,
    cfg: &PipelineCfg,
) -> RunStats {
    ensure_metrics_described();
    let mut stats = RunStats::default();

    for (i, keyword) in cfg.keywords.iter().enumerate() {
        tracing::info!(keyword, "searching");

        for source in sources {
            let items = match source.search(keyword).await {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(error = ?e, source = source.name(), keyword, "search failed");
                    stats.source_errors += 1;
                    counter!("scout_source_errors_total").increment(1);
                    continue;
                }
            };
            if items.is_empty() {
                continue;
            }

            let now = Utc::now().naive_utc();
            let records =
                build_records(now, source.name(), items, summarizer, cfg.lookback, &mut stats)
                    .await;

            let written = writer.persist(&records).await;
            stats.written += written;
            counter!("scout_trends_written_total").increment(written as u64);
            tracing::info!(
                source = source.name(),
                keyword,
                batch = records.len(),
                written,
                "batch persisted"
            );
        }

        if i + 1 < cfg.keywords.len() {
            tokio::time::sleep(cfg.keyword_delay).await;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct FixedSummarizer;

    #[async_trait]
    impl Summarizer for FixedSummarizer {
        async fn summarize(&self, _text: &str) -> String {
            "A fixed claim.".to_string()
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 20)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn empty_text_items_produce_no_records() {
        let items = vec![RawResult {
            updated_at: "2025-08-10T12:00:00Z".into(),
            text: String::new(),
        }];
        let mut stats = RunStats::default();
        let recs = build_records(
            now(),
            "GitHub",
            items,
            &FixedSummarizer,
            Duration::days(180),
            &mut stats,
        )
        .await;
        assert!(recs.is_empty());
        assert_eq!(stats.skipped_empty, 1);
    }

    #[tokio::test]
    async fn malformed_timestamp_skips_only_that_item() {
        let items = vec![
            RawResult {
                updated_at: "not a date".into(),
                text: "broken item".into(),
            },
            RawResult {
                updated_at: "2025-08-10T12:00:00Z".into(),
                text: "good item".into(),
            },
        ];
        let mut stats = RunStats::default();
        let recs = build_records(
            now(),
            "ArXiv",
            items,
            &FixedSummarizer,
            Duration::days(180),
            &mut stats,
        )
        .await;
        assert_eq!(recs.len(), 1);
        assert_eq!(stats.skipped_malformed, 1);
        assert_eq!(recs[0].source_tag, "ArXiv");
    }
}
