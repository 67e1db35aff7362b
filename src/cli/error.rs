//! CLI error types and conversions

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::records::RecordError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Catalog identifier error
    #[error("catalog error: {0}")]
    CatalogError(#[from] CatalogError),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    /// Record ingestion error
    #[error("record error: {0}")]
    RecordError(#[from] RecordError),

    /// Invalid argument combination
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Filesystem error while writing reports
    #[error("IO error: {0}")]
    IoError(String),
}
