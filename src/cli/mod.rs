//! CLI command implementations

pub mod download;
pub mod error;
pub mod sources;
pub mod validate;

pub use download::{Cli, Commands, DownloadArgs};
pub use error::CliError;
pub use sources::SourcesCommand;
pub use validate::ValidateCommand;
