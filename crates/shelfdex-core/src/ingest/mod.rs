//! Ingest pipeline
//!
//! The scanner runs on a scoped thread and feeds a bounded channel; the
//! batch writer drains it on the calling thread. In bulk mode the whole
//! scan is bracketed by `Database::begin_bulk`/`end_bulk`.

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{bounded, Receiver};
use serde::Serialize;

use crate::cancel::CancelToken;
use crate::config::{BatchErrorPolicy, IngestConfig};
use crate::db::{BatchOutcome, BatchWriter, Database, EntityCaches, WriterOptions};
use crate::error::{Result, ShelfdexError};
use crate::inpx::{Record, ScanSummary, Scanner};
use crate::trace_time;

/// What one ingest run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub scan: ScanSummary,
    pub batches_committed: usize,
    pub batches_failed: usize,
    pub batches_retried: usize,
    pub records_written: usize,
    /// Records lost with failed batches
    pub records_dropped: usize,
    pub books_inserted: usize,
    pub books_updated: usize,
    pub bulk: bool,
    pub warnings: Vec<String>,
}

impl IngestReport {
    fn committed(&mut self, records: usize, outcome: BatchOutcome) {
        self.batches_committed += 1;
        self.records_written += records;
        self.books_inserted += outcome.inserted;
        self.books_updated += outcome.updated;
    }
}

/// Ingest every index container under `root`.
///
/// Blocks until the scan and, in bulk mode, the restore sequence finish.
/// Batches committed before a failure or cancellation stay committed.
#[tracing::instrument(skip(db, config, cancel), fields(root = %root.display(), bulk = config.bulk))]
pub fn ingest(
    db: &Database,
    root: &Path,
    config: &IngestConfig,
    cancel: &CancelToken,
) -> Result<IngestReport> {
    if !root.is_dir() {
        return Err(ShelfdexError::LibraryNotFound(root.to_path_buf()));
    }

    let start = Instant::now();
    let caches = EntityCaches::new();
    let scanner = Scanner::new(root, &config.archive_extensions);
    let mut report = IngestReport {
        bulk: config.bulk,
        ..IngestReport::default()
    };

    let settings = if config.bulk {
        caches.warm(db)?;
        Some(db.begin_bulk()?)
    } else {
        None
    };

    let result = run_pipeline(db, &caches, &scanner, config, cancel, &mut report);

    if let Some(settings) = settings {
        let bulk = db.end_bulk(settings);
        report.warnings.extend(bulk.warnings);
    }
    caches.log_metrics();
    trace_time!(start, "ingest", batches = report.batches_committed);

    result?;
    if cancel.is_cancelled() {
        tracing::warn!(
            batches = report.batches_committed,
            records = report.records_written,
            "Ingest interrupted"
        );
        return Err(ShelfdexError::Interrupted);
    }

    tracing::info!(
        records = report.records_written,
        inserted = report.books_inserted,
        updated = report.books_updated,
        failed_batches = report.batches_failed,
        "Ingest finished"
    );
    Ok(report)
}

fn run_pipeline(
    db: &Database,
    caches: &EntityCaches,
    scanner: &Scanner,
    config: &IngestConfig,
    cancel: &CancelToken,
    report: &mut IngestReport,
) -> Result<()> {
    let (tx, rx) = bounded(config.channel_capacity);
    let writer = BatchWriter::new(db, caches, WriterOptions::from(config));

    thread::scope(|s| {
        let producer = s.spawn(|| scanner.run(tx, cancel));
        let drained = drain(rx, &writer, config, report);

        let scanned = producer
            .join()
            .map_err(|_| ShelfdexError::Other("scanner thread panicked".to_string()))?;
        // A container error outranks whatever the writer saw after it
        report.scan = scanned?;
        drained
    })
}

/// Consume records until the channel closes. Taking `rx` by value means an
/// early return disconnects the scanner.
fn drain(
    rx: Receiver<Record>,
    writer: &BatchWriter<'_>,
    config: &IngestConfig,
    report: &mut IngestReport,
) -> Result<()> {
    let mut batch = Vec::with_capacity(config.batch_size);
    for record in rx.iter() {
        batch.push(record);
        if batch.len() >= config.batch_size {
            flush(writer, &mut batch, config, report)?;
        }
    }
    flush(writer, &mut batch, config, report)
}

fn flush(
    writer: &BatchWriter<'_>,
    batch: &mut Vec<Record>,
    config: &IngestConfig,
    report: &mut IngestReport,
) -> Result<()> {
    if batch.is_empty() {
        return Ok(());
    }

    let records = batch.len();
    let result = write_with_policy(writer, batch, config, report);
    batch.clear();

    match result {
        Ok(outcome) => {
            report.committed(records, outcome);
            Ok(())
        }
        Err(e) => {
            report.batches_failed += 1;
            report.records_dropped += records;
            if config.on_batch_error == BatchErrorPolicy::Abort {
                return Err(e);
            }
            tracing::error!(error = %e, records, "Batch dropped");
            report
                .warnings
                .push(format!("dropped batch of {} records: {}", records, e));
            Ok(())
        }
    }
}

fn write_with_policy(
    writer: &BatchWriter<'_>,
    batch: &[Record],
    config: &IngestConfig,
    report: &mut IngestReport,
) -> Result<BatchOutcome> {
    match writer.write_batch(batch) {
        Err(e) if config.on_batch_error == BatchErrorPolicy::RetryThenContinue => {
            tracing::warn!(
                error = %e,
                backoff_ms = config.retry_backoff_ms,
                "Batch failed, retrying"
            );
            report.batches_retried += 1;
            thread::sleep(Duration::from_millis(config.retry_backoff_ms));
            writer.write_batch(batch)
        }
        result => result,
    }
}
