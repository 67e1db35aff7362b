//! Download execution, outcome bookkeeping, and progress reporting
//!
//! The executor turns one retained candidate into one outcome: a successful
//! transfer, a skip because the destination already exists, or a failure
//! after all retry attempts. Outcomes feed [`stats::RunStatistics`], and
//! every state transition of a (record, product) unit is surfaced through
//! [`progress::ProgressSink`].

pub mod executor;
pub mod progress;
pub mod stats;

pub use executor::DownloadExecutor;
pub use progress::{LogSink, NullSink, ProgressEvent, ProgressSink};
pub use stats::RunStatistics;

/// Transfer errors for a single attempt or an exhausted retry sequence
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Transport-level failure (connect, timeout, interrupted body)
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx HTTP response
    #[error("HTTP error: {0}")]
    Http(String),

    /// Local filesystem failure while writing the file
    #[error("IO error: {0}")]
    Io(String),
}

/// Outcome of processing one candidate through the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// File transferred and renamed into place
    Success,
    /// Destination already existed and overriding is disabled; no network
    /// call was made
    SkippedExisting,
    /// All transfer attempts failed; carries the last error description
    Failed(String),
}
