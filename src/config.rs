//! Run configuration and credential handling
//!
//! A [`RunConfig`] is constructed once, validated before any network call,
//! and then owned by the run. Membership of the collection, products, and
//! baseline in their closed sets is already guaranteed by the types from
//! [`crate::catalog`]; this module validates everything the types cannot:
//! non-empty product list, positive time tolerance, and present credentials.

use crate::catalog::{Baseline, Collection, ProductCode};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default number of transfer attempts per candidate
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default search-window half-width in minutes
pub const DEFAULT_TIME_TOLERANCE_MINUTES: i64 = 11;

/// Configuration errors, all fatal before any record is processed
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Product list is empty
    #[error("product list must not be empty")]
    EmptyProducts,

    /// Time tolerance must be strictly positive
    #[error("time tolerance must be positive, got {0} minutes")]
    InvalidTolerance(i64),

    /// A credential field is missing or empty
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    /// Credentials file could not be read or parsed
    #[error("credentials file error: {0}")]
    CredentialsFile(String),

    /// Output directory could not be prepared
    #[error("failed to prepare output directory: {0}")]
    OutputDir(String),
}

/// Username/password pair for authenticated downloads
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create a credential pair; either part being empty is a fatal error
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, ConfigError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() {
            return Err(ConfigError::MissingCredential("username"));
        }
        if password.is_empty() {
            return Err(ConfigError::MissingCredential("password"));
        }
        Ok(Self { username, password })
    }

    /// Load credentials from a TOML file with `username` and `password` keys
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::CredentialsFile(format!("{}: {e}", path.display()))
        })?;
        let table: toml::Table = raw
            .parse()
            .map_err(|e| ConfigError::CredentialsFile(format!("{}: {e}", path.display())))?;

        let username = table
            .get("username")
            .and_then(|v| v.as_str())
            .ok_or(ConfigError::MissingCredential("username"))?;
        let password = table
            .get("password")
            .and_then(|v| v.as_str())
            .ok_or(ConfigError::MissingCredential("password"))?;

        Self::new(username, password)
    }

    /// Username for HTTP Basic authentication
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password for HTTP Basic authentication
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated configuration for a single download run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Catalog collection to search
    pub collection: Collection,
    /// Products to download, processed in this order for every record
    pub products: Vec<ProductCode>,
    /// Processing baseline candidates must carry
    pub baseline: Baseline,
    /// Root directory for downloaded files (one subdirectory per product)
    pub output_dir: PathBuf,
    /// Credential pair for file transfers
    pub credentials: Credentials,
    /// Total transfer attempts per candidate
    pub max_retries: u32,
    /// Search-window half-width in minutes
    pub time_tolerance_minutes: i64,
    /// Re-download files that already exist at their destination
    pub override_existing: bool,
}

impl RunConfig {
    /// Create a run configuration with default retry/tolerance settings
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyProducts`] when no products are given.
    /// Collection, product, and baseline membership is enforced by their
    /// types at parse time.
    pub fn new(
        collection: Collection,
        products: Vec<ProductCode>,
        baseline: Baseline,
        output_dir: impl Into<PathBuf>,
        credentials: Credentials,
    ) -> Result<Self, ConfigError> {
        if products.is_empty() {
            return Err(ConfigError::EmptyProducts);
        }
        Ok(Self {
            collection,
            products,
            baseline,
            output_dir: output_dir.into(),
            credentials,
            max_retries: DEFAULT_MAX_RETRIES,
            time_tolerance_minutes: DEFAULT_TIME_TOLERANCE_MINUTES,
            override_existing: false,
        })
    }

    /// Set the total number of transfer attempts per candidate
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the search-window half-width in minutes (must be positive)
    pub fn with_time_tolerance(mut self, minutes: i64) -> Result<Self, ConfigError> {
        if minutes <= 0 {
            return Err(ConfigError::InvalidTolerance(minutes));
        }
        self.time_tolerance_minutes = minutes;
        Ok(self)
    }

    /// Enable or disable re-downloading over existing files
    pub fn with_override_existing(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }

    /// Create the output directory and one subdirectory per product
    pub fn prepare_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| ConfigError::OutputDir(format!("{}: {e}", self.output_dir.display())))?;
        for product in &self.products {
            let dir = self.output_dir.join(product.as_str());
            std::fs::create_dir_all(&dir)
                .map_err(|e| ConfigError::OutputDir(format!("{}: {e}", dir.display())))?;
        }
        Ok(())
    }
}
