//! Outbound seams of the pipeline.
//!
//! The core reports progress and hands off the final dataset through these
//! traits; the CLI supplies the real implementations. Every `ProgressSink`
//! method has an empty default body, so a no-op observer is just an empty
//! impl.

use anyhow::Result;

use crate::record::{CombinedRecord, ConnectivityResult};

/// Observer for human-readable status along the run. Purely observational;
/// the pipeline behaves identically under a no-op implementation.
pub trait ProgressSink: Send + Sync {
    /// A pipeline stage is about to fan out over `candidates` inputs.
    fn stage_started(&self, _stage: &str, _candidates: usize) {}

    /// One connectivity probe finished.
    fn connectivity_result(&self, _result: &ConnectivityResult) {}

    /// An enrichment batch (1-based `index` of `total`) is being dispatched.
    fn batch_started(&self, _index: usize, _total: usize, _size: usize) {}

    /// One candidate's record has been fully joined.
    fn record_combined(&self, _record: &CombinedRecord) {}
}

/// An observer that ignores everything.
pub struct NoopProgress;

impl ProgressSink for NoopProgress {}

/// Receives the final ranked dataset for persistence.
pub trait ResultSink {
    fn persist(&mut self, records: &[CombinedRecord]) -> Result<()>;
}
