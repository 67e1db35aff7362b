//! Progress notification for (record, product) units
//!
//! The engine reports every state transition through a caller-supplied
//! [`ProgressSink`]; it never mutates caller-owned state directly. An
//! external scheduler can run the engine on its own task and observe
//! progress at this boundary.

use super::DownloadOutcome;
use crate::catalog::ProductCode;
use tracing::{debug, info, warn};

/// One state transition of a (record, product) unit
///
/// Terminal transitions for a unit are [`SearchFailed`], [`NoMatch`], and
/// [`NoBaselineMatch`]; a unit that reaches the download stage terminates
/// with one [`Finished`] event per candidate.
///
/// [`SearchFailed`]: ProgressEvent::SearchFailed
/// [`NoMatch`]: ProgressEvent::NoMatch
/// [`NoBaselineMatch`]: ProgressEvent::NoBaselineMatch
/// [`Finished`]: ProgressEvent::Finished
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Search started for the unit
    Searching {
        /// Source row index
        row: usize,
        /// Product being searched
        product: ProductCode,
    },
    /// Search stage failed (timestamp, descriptor, request, or feed error)
    SearchFailed {
        /// Source row index
        row: usize,
        /// Product being searched
        product: ProductCode,
        /// Error description
        error: String,
    },
    /// Search succeeded but returned no candidates
    NoMatch {
        /// Source row index
        row: usize,
        /// Product being searched
        product: ProductCode,
    },
    /// Search returned candidates, baseline filtering comes next
    Found {
        /// Source row index
        row: usize,
        /// Product being searched
        product: ProductCode,
        /// Number of candidates before filtering
        candidates: usize,
    },
    /// No candidate carried the configured baseline
    NoBaselineMatch {
        /// Source row index
        row: usize,
        /// Product being searched
        product: ProductCode,
    },
    /// Transfer started for one retained candidate
    Downloading {
        /// Source row index
        row: usize,
        /// Product being downloaded
        product: ProductCode,
        /// Candidate title
        title: String,
    },
    /// One candidate reached a terminal outcome
    Finished {
        /// Source row index
        row: usize,
        /// Product being downloaded
        product: ProductCode,
        /// Candidate title
        title: String,
        /// Terminal outcome for this candidate
        outcome: DownloadOutcome,
    },
}

/// Observer notified after every unit state transition
pub trait ProgressSink: Send {
    /// Called synchronously by the engine after each transition
    fn on_event(&mut self, event: &ProgressEvent);
}

/// Sink that discards all events
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_event(&mut self, _event: &ProgressEvent) {}
}

/// Sink that forwards events to the tracing subscriber
#[derive(Debug, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn on_event(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Searching { row, product } => {
                debug!(row, %product, "searching");
            }
            ProgressEvent::SearchFailed { row, product, error } => {
                warn!(row, %product, %error, "search failed");
            }
            ProgressEvent::NoMatch { row, product } => {
                debug!(row, %product, "no products found");
            }
            ProgressEvent::Found { row, product, candidates } => {
                debug!(row, %product, candidates, "candidates found");
            }
            ProgressEvent::NoBaselineMatch { row, product } => {
                debug!(row, %product, "no candidates with configured baseline");
            }
            ProgressEvent::Downloading { row, product, title } => {
                info!(row, %product, %title, "downloading");
            }
            ProgressEvent::Finished { row, product, title, outcome } => {
                info!(row, %product, %title, ?outcome, "candidate finished");
            }
        }
    }
}
