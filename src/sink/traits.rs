//! Sink traits and outcome types

use crate::record::CandidateRecord;
use thiserror::Error;

/// Errors raised while writing one batch
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Remote rejected batch with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid sink endpoint: {0}")]
    Endpoint(String),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// A batch that could not be written
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    /// Zero-based batch index
    pub batch: usize,

    /// Number of records in the batch
    pub rows: usize,

    /// Human-readable failure description
    pub message: String,
}

/// Tally of a completed write
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SinkReport {
    pub batches_ok: usize,
    pub batches_failed: usize,
    pub rows_written: usize,
    pub failures: Vec<BatchFailure>,
}

impl SinkReport {
    pub fn is_clean(&self) -> bool {
        self.batches_failed == 0
    }
}

/// What happened when the sink was asked to write
#[derive(Debug, Clone, PartialEq)]
pub enum SinkOutcome {
    /// No credential is configured; nothing was sent
    Skipped,

    /// Batches were attempted
    Written(SinkReport),
}

impl SinkOutcome {
    /// Failures to append to the checkpoint's error log
    pub fn failures(&self) -> &[BatchFailure] {
        match self {
            Self::Skipped => &[],
            Self::Written(report) => &report.failures,
        }
    }

    pub fn rows_written(&self) -> usize {
        match self {
            Self::Skipped => 0,
            Self::Written(report) => report.rows_written,
        }
    }
}

/// Trait for remote record destinations
///
/// Implementations must never abort the run: every failure is folded into
/// the returned outcome.
#[allow(async_fn_in_trait)]
pub trait Sink {
    /// Upserts the records, keyed on `source_url`
    ///
    /// # Arguments
    ///
    /// * `records` - Deduplicated records for the whole run
    async fn write(&self, records: &[CandidateRecord]) -> SinkOutcome;
}
