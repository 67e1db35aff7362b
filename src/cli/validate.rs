//! Validation subcommand: check configurations and inputs offline

use crate::catalog::{Baseline, Collection, ProductCode};
use crate::records::{self, ColumnMapping};
use clap::Parser;
use std::path::PathBuf;

use super::CliError;

/// Validate command for checking identifiers and input files
#[derive(Parser, Debug)]
pub struct ValidateCommand {
    /// What to validate
    #[command(subcommand)]
    pub target: ValidateTarget,
}

/// Target type for validation
#[derive(clap::Subcommand, Debug)]
pub enum ValidateTarget {
    /// Validate a collection / products / baseline combination
    Config {
        /// Catalog collection
        #[arg(long)]
        collection: Collection,

        /// Product code; repeat for multiple products
        #[arg(long = "product", required = true)]
        products: Vec<ProductCode>,

        /// Processing baseline
        #[arg(long)]
        baseline: Baseline,
    },
    /// Validate an overpass CSV file and report the resolved columns
    Csv {
        /// CSV file to check
        csv: PathBuf,

        /// CSV column carrying the overpass date
        #[arg(long, default_value = "yyyy-mm-dd")]
        date_column: String,

        /// CSV column carrying the time of day
        #[arg(long, default_value = "hh:mm:ss.sss")]
        time_column: String,

        /// CSV column carrying the absolute orbit number
        #[arg(long, default_value = "Absolute_Orbit")]
        orbit_column: String,

        /// CSV column carrying the station / zone label
        #[arg(long, default_value = "Zone")]
        station_column: String,
    },
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self) -> Result<(), CliError> {
        match &self.target {
            ValidateTarget::Config {
                collection,
                products,
                baseline,
            } => {
                // Membership is proven by successful argument parsing;
                // report what the run would search for.
                println!("collection: {} ({})", collection.id(), collection.description());
                for product in products {
                    println!("product:    {} (searches as {})", product, product.search_code());
                }
                println!("baseline:   {baseline}");
                println!("OK");
            }
            ValidateTarget::Csv {
                csv,
                date_column,
                time_column,
                orbit_column,
                station_column,
            } => {
                let columns = ColumnMapping {
                    date: date_column.clone(),
                    time: Some(time_column.clone()),
                    orbit: Some(orbit_column.clone()),
                    station: Some(station_column.clone()),
                };
                let records = records::read_overpass_csv(csv, &columns)?;
                let with_time = records.iter().filter(|r| r.time.is_some()).count();
                let with_orbit = records.iter().filter(|r| r.orbit.is_some()).count();

                println!("rows:       {}", records.len());
                println!("with time:  {with_time}");
                println!("with orbit: {with_orbit}");
                println!("OK");
            }
        }
        Ok(())
    }
}
