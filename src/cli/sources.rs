//! CLI command for listing known collections, products, and baselines

use crate::catalog::{Baseline, Collection, ProductCode};
use clap::Args;
use serde_json::json;

use super::CliError;

/// Sources subcommand
#[derive(Debug, Args)]
pub struct SourcesCommand {
    #[command(subcommand)]
    action: SourcesAction,
}

/// Sources actions
#[derive(Debug, clap::Subcommand)]
enum SourcesAction {
    /// List catalog collections
    Collections {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
    /// List downloadable product codes
    Products {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
    /// List processing baselines
    Baselines {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

/// Output format for the sources command
#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

impl SourcesCommand {
    /// Execute the sources command
    pub fn execute(&self) -> Result<(), CliError> {
        match &self.action {
            SourcesAction::Collections { format } => match format {
                OutputFormat::Human => {
                    for collection in Collection::ALL {
                        println!("{:<24} {}", collection.id(), collection.description());
                    }
                }
                OutputFormat::Json => {
                    let entries: Vec<_> = Collection::ALL
                        .iter()
                        .map(|c| json!({"id": c.id(), "description": c.description()}))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&entries).expect("valid JSON"));
                }
            },
            SourcesAction::Products { format } => match format {
                OutputFormat::Human => {
                    for product in ProductCode::all() {
                        if product.search_code() != product.as_str() {
                            println!("{:<12} (searches as {})", product.as_str(), product.search_code());
                        } else {
                            println!("{}", product.as_str());
                        }
                    }
                }
                OutputFormat::Json => {
                    let entries: Vec<_> = ProductCode::all()
                        .map(|p| json!({"code": p.as_str(), "search_code": p.search_code()}))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&entries).expect("valid JSON"));
                }
            },
            SourcesAction::Baselines { format } => match format {
                OutputFormat::Human => {
                    for baseline in Baseline::ALL {
                        println!("{baseline}");
                    }
                }
                OutputFormat::Json => {
                    let entries: Vec<_> = Baseline::ALL.iter().map(|b| b.as_str()).collect();
                    println!("{}", serde_json::to_string_pretty(&entries).expect("valid JSON"));
                }
            },
        }
        Ok(())
    }
}
