//! HTTP client for catalog descriptors, searches, and file transfers
//!
//! All calls are blocking from the run's point of view (awaited in place)
//! with per-call timeouts: 30s for descriptor fetches, 60s for searches,
//! 300s for file transfers.

use super::{template, SearchError};
use crate::catalog::Collection;
use crate::config::Credentials;
use crate::downloader::DownloadError;
use std::time::Duration;
use tracing::debug;

/// Production catalog endpoint
pub const DEFAULT_CATALOG_URL: &str = "https://eocat.esa.int/eo-catalogue";

const DESCRIBE_TIMEOUT: Duration = Duration::from_secs(30);
const SEARCH_TIMEOUT: Duration = Duration::from_secs(60);
const TRANSFER_TIMEOUT: Duration = Duration::from_secs(300);

/// Catalog HTTP client
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Client against the production catalog
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_CATALOG_URL)
    }

    /// Client against an alternate catalog endpoint
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Descriptor URL for a collection
    pub fn describe_url(&self, collection: Collection) -> String {
        format!("{}/collections/{}/describe", self.base_url, collection)
    }

    /// Fetch a collection descriptor and extract its Atom search template
    pub async fn fetch_template(&self, collection: Collection) -> Result<String, SearchError> {
        let url = self.describe_url(collection);
        debug!(%url, "fetching collection descriptor");

        let response = self
            .http
            .get(&url)
            .timeout(DESCRIBE_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SearchError::DescriptorFetch(e.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::DescriptorFetch(e.to_string()))?;

        template::extract_template(&body)
    }

    /// Execute a substituted search URL and return the raw feed body
    pub async fn execute_search(&self, url: &str) -> Result<String, SearchError> {
        debug!(%url, "executing catalog search");

        let response = self
            .http
            .get(url)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SearchError::Request(e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))
    }

    /// Start an authenticated file transfer
    ///
    /// Returns the response with its status already checked; the caller
    /// streams the body to disk.
    pub async fn fetch_file(
        &self,
        url: &str,
        credentials: &Credentials,
    ) -> Result<reqwest::Response, DownloadError> {
        self.http
            .get(url)
            .basic_auth(credentials.username(), Some(credentials.password()))
            .timeout(TRANSFER_TIMEOUT)
            .send()
            .await
            .map_err(|e| DownloadError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| DownloadError::Http(e.to_string()))
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}
