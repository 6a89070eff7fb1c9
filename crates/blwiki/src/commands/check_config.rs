//! `blwiki check-config` command implementation.

use clap::Args;

use blwiki_config::Config;

use super::settings::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check-config command.
#[derive(Args)]
pub(crate) struct CheckConfigArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

impl CheckConfigArgs {
    /// Execute the check-config command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or Backlog
    /// settings are incomplete. Settings are printed before validation so a
    /// missing value shows up in the listing.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.config.load()?;
        for line in describe(&config) {
            output.line(&line);
        }

        config.require_backlog()?;
        output.done("Configuration is valid");
        Ok(())
    }
}

/// Resolved settings as display lines. The API key is never shown.
fn describe(config: &Config) -> Vec<String> {
    let backlog = &config.backlog;
    let sync = &config.sync_resolved;
    let source = config
        .config_path
        .as_ref()
        .map_or_else(|| "(defaults)".to_owned(), |p| p.display().to_string());
    let api_key = if backlog.api_key.is_empty() {
        "(not set)"
    } else {
        "***"
    };

    vec![
        format!("Config file: {source}"),
        format!("Space ID: {}", backlog.space_id),
        format!("Base URL: {}", backlog.base_url()),
        format!("Project ID: {}", backlog.project_id),
        format!("API key: {api_key}"),
        format!("Documents: {}", sync.docs_dir.display()),
        format!("Files: {}", sync.files_dir.display()),
        format!("Delete Mode: {}", sync.delete_mode),
    ]
}
