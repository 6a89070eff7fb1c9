//! CLI error types.

use blwiki_config::ConfigError;
use blwiki_sync::SyncError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Sync(#[from] SyncError),
}
