//! Sequential batch driver: one file at a time, in collection order.

use crate::types::ImageRecord;

use super::extract::MetadataExtractor;
use super::source::FileHandle;

/// Receives progress from a batch run. Every method defaults to a no-op.
pub trait ProgressSink {
    /// A run is starting with `total` files.
    fn started(&mut self, _total: usize) {}

    /// A record was finalized; `processed` counts it.
    fn record(&mut self, _record: &ImageRecord, _processed: usize, _total: usize) {}

    /// All `total` files were processed.
    fn completed(&mut self, _total: usize) {}

    /// Collection found nothing to process.
    fn no_images(&mut self) {}
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ProgressSink for NoopSink {}

/// Counters and results owned by a single run.
struct RunContext {
    processed: usize,
    total: usize,
    records: Vec<ImageRecord>,
}

impl RunContext {
    fn new(total: usize) -> Self {
        Self {
            processed: 0,
            total,
            records: Vec::with_capacity(total),
        }
    }
}

/// Drives the extractor over collected files, strictly one at a time.
pub struct BatchPipeline {
    extractor: MetadataExtractor,
}

impl BatchPipeline {
    pub fn new(extractor: MetadataExtractor) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &MetadataExtractor {
        &self.extractor
    }

    /// Extract a record for every file, in order.
    ///
    /// Each file is awaited to completion before the next one starts, so the
    /// output has exactly one record per input file in the same order.
    pub async fn run(&self, files: &[FileHandle], sink: &mut dyn ProgressSink) -> Vec<ImageRecord> {
        let mut ctx = RunContext::new(files.len());
        sink.started(ctx.total);

        for file in files {
            let record = self.extractor.extract(file).await;
            ctx.processed += 1;
            sink.record(&record, ctx.processed, ctx.total);
            ctx.records.push(record);
        }

        sink.completed(ctx.total);
        ctx.records
    }
}
