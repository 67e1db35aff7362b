//! Run orchestration: records × products → search → filter → download
//!
//! The runner drives every (record, product) unit through the search,
//! filter, and download stages in strict source order, records outcomes in
//! the run's statistics, and notifies the progress sink after each state
//! transition. Within a run, only configuration errors are fatal; every
//! per-unit error is recorded and the run moves on to the next unit.

use crate::catalog::ProductCode;
use crate::config::{ConfigError, RunConfig};
use crate::downloader::{DownloadExecutor, ProgressEvent, ProgressSink, RunStatistics};
use crate::filter;
use crate::records::{self, ColumnMapping, OverpassRecord, RecordError};
use crate::search::{feed, query, CatalogClient};
use crate::timewindow::SearchWindow;
use std::path::Path;
use tracing::{info, warn};

/// Single-run download engine
///
/// Owns its configuration and HTTP client; each invocation of [`run`]
/// produces a fresh [`RunStatistics`] returned to the caller. Runs sharing
/// a destination directory must be coordinated externally.
///
/// [`run`]: DownloadRunner::run
pub struct DownloadRunner {
    config: RunConfig,
    client: CatalogClient,
}

impl DownloadRunner {
    /// Build a runner against the production catalog
    ///
    /// Creates the output directory tree up front; a directory that cannot
    /// be created is a fatal configuration error.
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        Self::with_client(config, CatalogClient::new())
    }

    /// Build a runner with a custom catalog client
    pub fn with_client(config: RunConfig, client: CatalogClient) -> Result<Self, ConfigError> {
        config.prepare_directories()?;
        Ok(Self { config, client })
    }

    /// Run configuration this runner was built with
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Read overpass records from a CSV file and run the engine over them
    pub async fn run_csv(
        &self,
        csv_path: &Path,
        columns: &ColumnMapping,
        sink: &mut dyn ProgressSink,
    ) -> Result<RunStatistics, RecordError> {
        let records = records::read_overpass_csv(csv_path, columns)?;
        info!(rows = records.len(), path = %csv_path.display(), "loaded overpass records");
        Ok(self.run(&records, sink).await)
    }

    /// Process every (record, product) unit in source order
    ///
    /// Never fails: per-unit errors surface exclusively through the
    /// returned statistics.
    pub async fn run(&self, records: &[OverpassRecord], sink: &mut dyn ProgressSink) -> RunStatistics {
        let mut stats = RunStatistics::new();
        let executor = DownloadExecutor::new(self.client.clone(), &self.config);

        // The search template is invariant for a fixed collection within a
        // run; fetch it once on first use and reuse it afterwards.
        let mut template: Option<String> = None;

        for record in records {
            for product in &self.config.products {
                self.process_unit(record, product, &executor, &mut template, &mut stats, sink)
                    .await;
            }
        }

        stats.log_summary();
        stats
    }

    async fn process_unit(
        &self,
        record: &OverpassRecord,
        product: &ProductCode,
        executor: &DownloadExecutor,
        template: &mut Option<String>,
        stats: &mut RunStatistics,
        sink: &mut dyn ProgressSink,
    ) {
        let row = record.row;
        stats.record_search();
        sink.on_event(&ProgressEvent::Searching { row, product: product.clone() });

        let window = match SearchWindow::resolve(record, self.config.time_tolerance_minutes) {
            Ok(window) => window,
            Err(e) => {
                warn!(row, %product, error = %e, "could not resolve search window");
                stats.record_unit_failure(product, row, &e);
                sink.on_event(&ProgressEvent::SearchFailed {
                    row,
                    product: product.clone(),
                    error: e.to_string(),
                });
                return;
            }
        };

        let template = match template {
            Some(template) => template.clone(),
            None => match self.client.fetch_template(self.config.collection).await {
                Ok(fetched) => {
                    *template = Some(fetched.clone());
                    fetched
                }
                Err(e) => {
                    warn!(row, %product, error = %e, "could not resolve search template");
                    stats.record_unit_error(product, row, &e);
                    sink.on_event(&ProgressEvent::SearchFailed {
                        row,
                        product: product.clone(),
                        error: e.to_string(),
                    });
                    return;
                }
            },
        };

        let url = query::build_search_url(&template, product, &window);
        let body = match self.client.execute_search(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(row, %product, error = %e, "search request failed");
                stats.record_unit_error(product, row, &e);
                sink.on_event(&ProgressEvent::SearchFailed {
                    row,
                    product: product.clone(),
                    error: e.to_string(),
                });
                return;
            }
        };

        // A malformed feed is recorded but handled as "no products found"
        let candidates = match feed::parse_feed(&body) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(row, %product, error = %e, "search response was not a valid feed");
                stats.record_unit_error(product, row, &e);
                Vec::new()
            }
        };

        if candidates.is_empty() {
            warn!(row, %product, date = %record.date, "no products found");
            sink.on_event(&ProgressEvent::NoMatch { row, product: product.clone() });
            return;
        }
        sink.on_event(&ProgressEvent::Found {
            row,
            product: product.clone(),
            candidates: candidates.len(),
        });

        let retained = filter::retain_baseline(candidates, self.config.baseline);
        if retained.is_empty() {
            warn!(
                row,
                %product,
                baseline = %self.config.baseline,
                "no candidates with configured baseline"
            );
            sink.on_event(&ProgressEvent::NoBaselineMatch { row, product: product.clone() });
            return;
        }

        for candidate in &retained {
            sink.on_event(&ProgressEvent::Downloading {
                row,
                product: product.clone(),
                title: candidate.title.clone(),
            });
            if let Some(outcome) = executor.download_candidate(candidate, product).await {
                stats.record_outcome(product, row, &outcome);
                sink.on_event(&ProgressEvent::Finished {
                    row,
                    product: product.clone(),
                    title: candidate.title.clone(),
                    outcome,
                });
            }
        }
    }
}
