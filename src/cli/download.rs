//! Download command implementation

use crate::catalog::{Baseline, Collection, ProductCode};
use crate::config::{Credentials, RunConfig};
use crate::downloader::{DownloadOutcome, ProgressEvent, ProgressSink};
use crate::records::{self, ColumnMapping};
use crate::runner::DownloadRunner;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;

use super::CliError;

/// Display cap for the error list in the terminal summary; the full list
/// stays available through `--stats-json`
const ERROR_DISPLAY_LIMIT: usize = 20;

/// EarthCARE Product Downloader CLI
#[derive(Parser, Debug)]
#[command(name = "earthcare-downloader")]
#[command(about = "Download EarthCARE products from the OADS catalog", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download products for the overpasses listed in a CSV file
    Download(DownloadArgs),

    /// List known collections, products, and baselines
    Sources(super::SourcesCommand),

    /// Validate a configuration or input file without touching the network
    Validate(super::ValidateCommand),
}

/// Download command arguments
#[derive(Parser, Debug)]
pub struct DownloadArgs {
    /// CSV file with overpass records
    pub csv: PathBuf,

    /// Catalog collection to search (e.g. EarthCAREL2InstChecked)
    #[arg(long)]
    pub collection: Collection,

    /// Product code to download; repeat for multiple products
    #[arg(long = "product", required = true)]
    pub products: Vec<ProductCode>,

    /// Processing baseline candidates must carry (e.g. BA)
    #[arg(long)]
    pub baseline: Baseline,

    /// Root directory for downloaded files
    #[arg(long, default_value = "downloads")]
    pub output_dir: PathBuf,

    /// TOML file with `username` and `password` keys
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Username (alternative to --credentials)
    #[arg(long)]
    pub username: Option<String>,

    /// Password (alternative to --credentials)
    #[arg(long)]
    pub password: Option<String>,

    /// Total transfer attempts per candidate
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    /// Search-window half-width in minutes
    #[arg(long, default_value_t = 11)]
    pub time_tolerance: i64,

    /// Re-download files that already exist at their destination
    #[arg(long, default_value_t = false)]
    pub override_existing: bool,

    /// CSV column carrying the overpass date
    #[arg(long, default_value = "yyyy-mm-dd")]
    pub date_column: String,

    /// CSV column carrying the time of day
    #[arg(long, default_value = "hh:mm:ss.sss")]
    pub time_column: String,

    /// CSV column carrying the absolute orbit number
    #[arg(long, default_value = "Absolute_Orbit")]
    pub orbit_column: String,

    /// CSV column carrying the station / zone label
    #[arg(long, default_value = "Zone")]
    pub station_column: String,

    /// Write the final run statistics to this file as JSON
    #[arg(long)]
    pub stats_json: Option<PathBuf>,

    /// Disable the progress bar, log through tracing only
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

impl DownloadArgs {
    /// Execute the download command
    pub async fn execute(&self) -> Result<(), CliError> {
        let credentials = self.resolve_credentials()?;
        let columns = self.column_mapping();

        let config = RunConfig::new(
            self.collection,
            self.products.clone(),
            self.baseline,
            &self.output_dir,
            credentials,
        )?
        .with_max_retries(self.max_retries)
        .with_time_tolerance(self.time_tolerance)?
        .with_override_existing(self.override_existing);

        info!(
            collection = %config.collection,
            products = config.products.len(),
            baseline = %config.baseline,
            "starting download run"
        );

        let records = records::read_overpass_csv(&self.csv, &columns)?;
        let runner = DownloadRunner::new(config)?;

        let total_units = (records.len() * self.products.len()) as u64;
        let stats = if self.quiet {
            let mut sink = crate::downloader::LogSink;
            runner.run(&records, &mut sink).await
        } else {
            let mut sink = ProgressBarSink::new(total_units);
            let stats = runner.run(&records, &mut sink).await;
            sink.finish();
            stats
        };

        println!("Run summary");
        println!("  total requests:       {}", stats.total_requests);
        println!("  successful downloads: {}", stats.successful_downloads);
        println!("  failed downloads:     {}", stats.failed_downloads);
        println!("  skipped existing:     {}", stats.skipped_existing);
        println!("  errors:               {}", stats.errors.len());
        for error in stats.errors_truncated(ERROR_DISPLAY_LIMIT) {
            println!("    - {error}");
        }
        if stats.errors.len() > ERROR_DISPLAY_LIMIT {
            println!(
                "    ... and {} more",
                stats.errors.len() - ERROR_DISPLAY_LIMIT
            );
        }

        if let Some(path) = &self.stats_json {
            let json = serde_json::to_string_pretty(&stats)
                .map_err(|e| CliError::IoError(e.to_string()))?;
            std::fs::write(path, json)
                .map_err(|e| CliError::IoError(format!("{}: {e}", path.display())))?;
            info!(path = %path.display(), "wrote run statistics");
        }

        Ok(())
    }

    fn resolve_credentials(&self) -> Result<Credentials, CliError> {
        if let Some(path) = &self.credentials {
            return Ok(Credentials::from_toml_file(path)?);
        }
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                Ok(Credentials::new(username.as_str(), password.as_str())?)
            }
            _ => Err(CliError::InvalidArgument(
                "provide --credentials FILE or both --username and --password".to_string(),
            )),
        }
    }

    fn column_mapping(&self) -> ColumnMapping {
        ColumnMapping {
            date: self.date_column.clone(),
            time: Some(self.time_column.clone()),
            orbit: Some(self.orbit_column.clone()),
            station: Some(self.station_column.clone()),
        }
    }
}

/// Progress sink backed by an indicatif bar; one tick per started unit
struct ProgressBarSink {
    bar: ProgressBar,
}

impl ProgressBarSink {
    fn new(total_units: u64) -> Self {
        let bar = ProgressBar::new(total_units);
        bar.set_style(
            ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("progress template is valid")
                .progress_chars("=> "),
        );
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

impl ProgressSink for ProgressBarSink {
    fn on_event(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Searching { row, product } => {
                self.bar.set_message(format!("{product} row {row}"));
                self.bar.inc(1);
            }
            ProgressEvent::Downloading { title, .. } => {
                self.bar.set_message(title.clone());
            }
            ProgressEvent::Finished { title, outcome, .. } => {
                if let DownloadOutcome::Failed(reason) = outcome {
                    self.bar.println(format!("failed: {title}: {reason}"));
                }
            }
            _ => {}
        }
    }
}
