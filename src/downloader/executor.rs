//! Retried file transfer with skip-existing semantics
//!
//! One candidate in, one outcome out. The destination is
//! `<output_dir>/<product_code>/<filename>`, the filename taken from the
//! last path segment of the download URL (falling back to the candidate
//! title plus `.zip`). Bodies are streamed to a `.part` sibling and renamed
//! into place on completion, so a failed transfer never leaves a file that
//! a later skip-check would mistake for a finished download.

use super::{DownloadError, DownloadOutcome};
use crate::catalog::ProductCode;
use crate::config::{Credentials, RunConfig};
use crate::search::{CandidateProduct, CatalogClient};
use futures_util::StreamExt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

/// Executes transfers for retained candidates
#[derive(Debug, Clone)]
pub struct DownloadExecutor {
    client: CatalogClient,
    output_dir: PathBuf,
    credentials: Credentials,
    max_retries: u32,
    override_existing: bool,
}

impl DownloadExecutor {
    /// Build an executor from the run configuration
    pub fn new(client: CatalogClient, config: &RunConfig) -> Self {
        Self {
            client,
            output_dir: config.output_dir.clone(),
            credentials: config.credentials.clone(),
            max_retries: config.max_retries,
            override_existing: config.override_existing,
        }
    }

    /// Destination path for a candidate's download URL
    pub fn destination(&self, candidate: &CandidateProduct, product: &ProductCode, href: &str) -> PathBuf {
        let filename = filename_from_url(href)
            .unwrap_or_else(|| format!("{}.zip", candidate.title));
        self.output_dir.join(product.as_str()).join(filename)
    }

    /// Process one retained candidate
    ///
    /// Returns `None` when the candidate carries no enclosure link (logged,
    /// not counted). Otherwise returns the candidate's terminal outcome.
    pub async fn download_candidate(
        &self,
        candidate: &CandidateProduct,
        product: &ProductCode,
    ) -> Option<DownloadOutcome> {
        let Some(link) = candidate.enclosure() else {
            warn!(title = %candidate.title, "candidate has no enclosure link, skipping");
            return None;
        };

        let destination = self.destination(candidate, product, &link.href);
        if destination.exists() && !self.override_existing {
            info!(path = %destination.display(), "destination exists, skipping download");
            return Some(DownloadOutcome::SkippedExisting);
        }

        match self.transfer_with_retry(&link.href, &destination).await {
            Ok(()) => {
                info!(path = %destination.display(), "download complete");
                Some(DownloadOutcome::Success)
            }
            Err(e) => Some(DownloadOutcome::Failed(e.to_string())),
        }
    }

    /// Attempt the transfer up to `max_retries` times
    ///
    /// The delay before retry `k` is `2^k` seconds, `k` counted from zero.
    async fn transfer_with_retry(&self, url: &str, destination: &Path) -> Result<(), DownloadError> {
        let mut last_error = DownloadError::Network("no transfer attempts were made".to_string());

        for attempt in 0..self.max_retries {
            match self.transfer(url, destination).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        error = %e,
                        url,
                        "transfer attempt failed"
                    );
                    last_error = e;
                    if attempt + 1 < self.max_retries {
                        tokio::time::sleep(backoff_delay(attempt)).await;
                    }
                }
            }
        }

        error!(url, retries = self.max_retries, "transfer failed after all attempts");
        Err(last_error)
    }

    /// Single transfer attempt: stream to a partial file, rename on success
    async fn transfer(&self, url: &str, destination: &Path) -> Result<(), DownloadError> {
        let response = self.client.fetch_file(url, &self.credentials).await?;

        let partial = partial_path(destination);
        let result = write_body(response, &partial).await;
        match result {
            Ok(()) => {
                std::fs::rename(&partial, destination)
                    .map_err(|e| DownloadError::Io(format!("{}: {e}", destination.display())))?;
                Ok(())
            }
            Err(e) => {
                // Never leave a partial file behind for a future skip-check
                if let Err(cleanup) = std::fs::remove_file(&partial) {
                    warn!(path = %partial.display(), error = %cleanup, "failed to remove partial file");
                }
                Err(e)
            }
        }
    }
}

/// Delay before retry attempt `k` (0-based): 2^k seconds
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt))
}

/// Sibling path the body is streamed to before the final rename
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push_str(".part");
    destination.with_file_name(name)
}

/// Stream a response body to disk
async fn write_body(response: reqwest::Response, path: &Path) -> Result<(), DownloadError> {
    let mut file = std::fs::File::create(path)
        .map_err(|e| DownloadError::Io(format!("{}: {e}", path.display())))?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DownloadError::Network(e.to_string()))?;
        file.write_all(&chunk)
            .map_err(|e| DownloadError::Io(format!("{}: {e}", path.display())))?;
    }
    file.flush()
        .map_err(|e| DownloadError::Io(format!("{}: {e}", path.display())))
}

/// Last path segment of a download URL, if it yields a usable name
fn filename_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.trim_end_matches('/').rsplit('/').next()?;
    if name.is_empty() || name.contains(':') {
        return None;
    }
    Some(name.to_string())
}
