//! Run-wide statistics
//!
//! One `RunStatistics` value is created per run, mutated only by the run
//! that owns it, and handed to the caller once the run finishes. The error
//! list is unbounded here; display layers may truncate through
//! [`RunStatistics::errors_truncated`] but the value itself retains every
//! entry.

use super::DownloadOutcome;
use crate::catalog::ProductCode;
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Counters and error log for a single download run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStatistics {
    /// Search requests issued, one per (record, product) unit
    pub total_requests: u64,
    /// Candidates transferred successfully
    pub successful_downloads: u64,
    /// Candidates that failed after all retries, plus units whose
    /// timestamp could not be resolved
    pub failed_downloads: u64,
    /// Candidates skipped because the destination already existed
    pub skipped_existing: u64,
    /// Human-readable error descriptions, oldest first
    pub errors: Vec<String>,
}

impl RunStatistics {
    /// Fresh statistics for a new run
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one search request for a (record, product) unit
    pub(crate) fn record_search(&mut self) {
        self.total_requests += 1;
    }

    /// Count one candidate outcome from the executor
    pub(crate) fn record_outcome(&mut self, product: &ProductCode, row: usize, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Success => self.successful_downloads += 1,
            DownloadOutcome::SkippedExisting => self.skipped_existing += 1,
            DownloadOutcome::Failed(reason) => {
                self.failed_downloads += 1;
                self.errors.push(format!("{product} row {row}: {reason}"));
            }
        }
    }

    /// Record a unit-level error that also counts as a failed download
    /// (a record whose timestamp never resolved cannot produce candidates)
    pub(crate) fn record_unit_failure(&mut self, product: &ProductCode, row: usize, error: impl fmt::Display) {
        self.failed_downloads += 1;
        self.errors.push(format!("{product} row {row}: {error}"));
    }

    /// Record a search-stage error; the unit proceeds as "no products found"
    pub(crate) fn record_unit_error(&mut self, product: &ProductCode, row: usize, error: impl fmt::Display) {
        self.errors.push(format!("{product} row {row}: {error}"));
    }

    /// At most `limit` oldest error entries, for display layers
    pub fn errors_truncated(&self, limit: usize) -> &[String] {
        &self.errors[..self.errors.len().min(limit)]
    }

    /// Log the final run summary
    pub fn log_summary(&self) {
        info!(
            total_requests = self.total_requests,
            successful_downloads = self.successful_downloads,
            failed_downloads = self.failed_downloads,
            skipped_existing = self.skipped_existing,
            errors = self.errors.len(),
            "run finished"
        );
    }
}
