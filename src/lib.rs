//! # EarthCARE Product Downloader Library
//!
//! A library for downloading EarthCARE satellite products from the ESA
//! OADS catalog, driven by overpass listings in CSV files. Built for
//! Cal/Val workflows that need the products acquired around each ground
//! overpass.
//!
//! ## Features
//!
//! - **Closed catalogs**: collections, product codes, and processing
//!   baselines are validated against closed sets before any network call
//! - **OpenSearch resolution**: the per-collection search template is
//!   fetched and resolved from the catalog's descriptor document
//! - **Baseline filtering**: candidates are filtered by the two-character
//!   processing-baseline token encoded in their titles
//! - **Robust transfers**: exponential-backoff retries, skip-existing
//!   semantics, and partial-file cleanup on failure
//! - **Run statistics**: one owned statistics value per run, with a full
//!   error log for reporting layers
//!
//! ## Quick Start
//!
//! ```no_run
//! use earthcare_downloader::catalog::{Baseline, Collection, ProductCode};
//! use earthcare_downloader::config::{Credentials, RunConfig};
//! use earthcare_downloader::downloader::LogSink;
//! use earthcare_downloader::records::ColumnMapping;
//! use earthcare_downloader::runner::DownloadRunner;
//! use std::path::Path;
//! use std::str::FromStr;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RunConfig::new(
//!     Collection::L2InstChecked,
//!     vec![ProductCode::from_str("ATL_ALD_2A")?],
//!     Baseline::Ba,
//!     "./downloads",
//!     Credentials::new("user", "secret")?,
//! )?;
//!
//! let runner = DownloadRunner::new(config)?;
//! let mut sink = LogSink;
//! let stats = runner
//!     .run_csv(Path::new("overpasses.csv"), &ColumnMapping::default(), &mut sink)
//!     .await?;
//! println!("{} downloads", stats.successful_downloads);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`catalog`] - Closed sets of collections, products, and baselines
//! - [`config`] - Run configuration and credentials
//! - [`records`] - Overpass record ingestion from CSV
//! - [`timewindow`] - Search-window resolution from record timestamps
//! - [`search`] - Catalog descriptor, query, and feed handling
//! - [`filter`] - Baseline filtering of candidates
//! - [`downloader`] - Retried transfers, outcomes, statistics, progress
//! - [`runner`] - Orchestration of the whole run

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Closed catalogs of collections, products, and baselines
pub mod catalog;

/// CLI command implementations
pub mod cli;

/// Run configuration and credential handling
pub mod config;

/// Download execution, outcomes, statistics, and progress
pub mod downloader;

/// Baseline filtering of search candidates
pub mod filter;

/// Overpass record ingestion
pub mod records;

/// Run orchestration
pub mod runner;

/// Catalog search round trip
pub mod search;

/// Search-window resolution
pub mod timewindow;

// Re-export the types most callers need
pub use catalog::{Baseline, Collection, ProductCode};
pub use config::{Credentials, RunConfig};
pub use downloader::{DownloadOutcome, ProgressEvent, ProgressSink, RunStatistics};
pub use records::{ColumnMapping, OverpassRecord};
pub use runner::DownloadRunner;
pub use timewindow::SearchWindow;
