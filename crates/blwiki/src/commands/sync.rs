//! `blwiki sync` command implementation.

use clap::Args;
use tracing::info;

use blwiki_backlog::BacklogClient;
use blwiki_sync::{FsAttachments, FsSource, PageOutcome, Reconciler, SyncOptions, SyncReport};

use super::settings::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sync command.
#[derive(Args)]
pub(crate) struct SyncArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Report what would change without writing to the wiki.
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output (show debug logs).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl SyncArgs {
    /// Execute the sync command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the remote page index
    /// cannot be fetched, or the documents directory cannot be scanned.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.config.load()?;
        let backlog = config.require_backlog()?;
        let sync = &config.sync_resolved;

        info!("Space ID: {}", backlog.space_id);
        info!("Base URL: {}", backlog.base_url());
        info!("Project ID: {}", backlog.project_id);
        info!("Delete Mode: {}", sync.delete_mode);
        info!("Documents: {}", sync.docs_dir.display());
        info!("Files: {}", sync.files_dir.display());

        let client = BacklogClient::from_config(backlog);
        let source = FsSource::new(sync.docs_dir.clone());
        let files = FsAttachments::new(sync.files_dir.clone());
        let options = SyncOptions {
            delete_mode: sync.delete_mode,
            dry_run: self.dry_run,
        };

        if options.dry_run {
            output.banner("[DRY RUN] No changes will be made");
        }

        let report = Reconciler::new(&client, &client, &source, &files, options).run()?;
        print_report(&output, &report);
        Ok(())
    }
}

fn print_report(output: &Output, report: &SyncReport) {
    for line in summary_lines(report) {
        output.line(&line);
    }

    for failure in report.failures() {
        if let PageOutcome::Failed(message) = &failure.outcome {
            let name = &failure.logical_name;
            output.attention(&format!("  failed: {name} ({message})"));
        }
    }
    for (name, message) in &report.delete_failures {
        output.attention(&format!("  delete failed: {name} ({message})"));
    }
    for name in &report.orphans_kept {
        output.attention(&format!("  kept (delete mode off): {name}"));
    }

    if report.has_failures() {
        output.attention("Sync finished with failures");
    } else {
        output.done("Sync complete");
    }
}

/// Summary order of per-document outcomes.
const OUTCOME_LABELS: [&str; 6] = [
    "created",
    "updated",
    "unchanged",
    "would create",
    "would update",
    "failed",
];

fn outcome_label(outcome: &PageOutcome) -> &'static str {
    match outcome {
        PageOutcome::Created(_) => "created",
        PageOutcome::Updated => "updated",
        PageOutcome::Unchanged => "unchanged",
        PageOutcome::WouldCreate => "would create",
        PageOutcome::WouldUpdate => "would update",
        PageOutcome::Failed(_) => "failed",
    }
}

/// Count lines for the summary, skipping zero counts.
fn summary_lines(report: &SyncReport) -> Vec<String> {
    let outcome_counts = OUTCOME_LABELS
        .into_iter()
        .map(|label| (label, report.count(|o| outcome_label(o) == label)));
    let orphan_counts = [
        ("deleted", report.deleted.len()),
        ("would delete", report.would_delete.len()),
        ("delete failed", report.delete_failures.len()),
        ("orphans kept", report.orphans_kept.len()),
    ];

    let mut lines = vec![format!("Documents: {}", report.documents.len())];
    lines.extend(
        outcome_counts
            .chain(orphan_counts)
            .filter(|(_, n)| *n > 0)
            .map(|(label, n)| format!("  {label}: {n}")),
    );
    lines
}

#[cfg(test)]
mod tests {
    use blwiki_sync::{DocumentOutcome, PageId};
    use pretty_assertions::assert_eq;

    use super::*;

    fn outcome(name: &str, outcome: PageOutcome) -> DocumentOutcome {
        DocumentOutcome {
            logical_name: name.to_owned(),
            outcome,
        }
    }

    #[test]
    fn test_summary_lines_skip_zero_counts() {
        let report = SyncReport {
            documents: vec![
                outcome("a", PageOutcome::Created(PageId(1))),
                outcome("b", PageOutcome::Unchanged),
                outcome("c", PageOutcome::Unchanged),
                outcome("d", PageOutcome::Failed("boom".to_owned())),
            ],
            deleted: vec!["old".to_owned()],
            ..SyncReport::default()
        };

        assert_eq!(
            summary_lines(&report),
            vec![
                "Documents: 4",
                "  created: 1",
                "  unchanged: 2",
                "  failed: 1",
                "  deleted: 1",
            ]
        );
    }

    #[test]
    fn test_summary_lines_dry_run() {
        let report = SyncReport {
            documents: vec![
                outcome("a", PageOutcome::WouldCreate),
                outcome("b", PageOutcome::WouldUpdate),
            ],
            would_delete: vec!["x".to_owned(), "y".to_owned()],
            ..SyncReport::default()
        };

        assert_eq!(
            summary_lines(&report),
            vec![
                "Documents: 2",
                "  would create: 1",
                "  would update: 1",
                "  would delete: 2",
            ]
        );
    }

    #[test]
    fn test_summary_lines_empty_report() {
        assert_eq!(summary_lines(&SyncReport::default()), vec!["Documents: 0"]);
    }
}
