//! Configuration arguments shared by all commands.

use std::path::PathBuf;

use blwiki_config::{CliSettings, Config};
use clap::Args;

use crate::error::CliError;

/// Configuration sources: file, environment and flags.
///
/// Flags and environment variables override values from `blwiki.toml`.
#[derive(Args, Debug, Default)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover blwiki.toml).
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Directory holding the Markdown documents.
    #[arg(long)]
    pub(crate) docs_dir: Option<PathBuf>,

    /// Directory holding files referenced as `/files/<name>`.
    #[arg(long)]
    pub(crate) files_dir: Option<PathBuf>,

    /// Backlog space id (the `<space>` in `<space>.backlog.jp`).
    #[arg(long, env = "BACKLOG_SPACE_ID")]
    pub(crate) space_id: Option<String>,

    /// Backlog project id or key.
    #[arg(long, env = "BACKLOG_PROJECT_ID")]
    pub(crate) project_id: Option<String>,

    /// Backlog API key.
    #[arg(long, env = "BACKLOG_API_KEY", hide_env_values = true)]
    pub(crate) api_key: Option<String>,

    /// Delete wiki pages that have no local document.
    #[arg(
        long = "delete",
        env = "DELETE_MODE",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = parse_delete_mode,
    )]
    pub(crate) delete_mode: Option<bool>,
}

impl ConfigArgs {
    /// Load configuration with these arguments layered on top.
    pub(crate) fn load(&self) -> Result<Config, CliError> {
        let cli_settings = self.cli_settings();
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            space_id: self.space_id.clone(),
            project_id: self.project_id.clone(),
            api_key: self.api_key.clone(),
            docs_dir: self.docs_dir.clone(),
            files_dir: self.files_dir.clone(),
            delete_mode: self.delete_mode,
        }
    }
}

/// Only a case-insensitive `true` enables delete mode; anything else disables it.
#[allow(clippy::unnecessary_wraps)]
fn parse_delete_mode(value: &str) -> Result<bool, String> {
    Ok(value.trim().eq_ignore_ascii_case("true"))
}
