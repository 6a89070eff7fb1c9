//! One-way reconciliation of local documents onto remote wiki pages.
//!
//! A run:
//! 1. Snapshots the remote page index (name -> page) once
//! 2. Creates, updates or skips one page per local document
//! 3. Deletes remote pages without a local document when delete mode is on
//!
//! Failures inside step 2 or of a single deletion are logged and recorded in
//! the [`SyncReport`]; only failures of the initial fetch and scan abort the run.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{error, info};

use crate::error::{DocumentError, SyncError};
use crate::normalize::normalize;
use crate::ports::{AttachmentFiles, AttachmentProvider, DocumentSource, PageRepository};
use crate::rewrite::ReferenceRewriter;
use crate::types::{Document, DocumentRef, PageId, RemotePage};

/// Options for a reconciliation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Delete remote pages that no local document maps to.
    pub delete_mode: bool,
    /// Only read: report what would change without writing anything.
    pub dry_run: bool,
}

/// What happened to one document's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page did not exist and was created.
    Created(PageId),
    /// Page content differed and was replaced.
    Updated,
    /// Page content already matched.
    Unchanged,
    /// Dry run: page would be created.
    WouldCreate,
    /// Dry run: page content differs and would be replaced.
    WouldUpdate,
    /// Processing failed; the message is already credential-free.
    Failed(String),
}

/// Outcome for a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOutcome {
    /// Document logical name (= page name).
    pub logical_name: String,
    /// What happened.
    pub outcome: PageOutcome,
}

/// Summary of a reconciliation run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Per-document outcomes in processing order.
    pub documents: Vec<DocumentOutcome>,
    /// Orphaned pages that were deleted.
    pub deleted: Vec<String>,
    /// Dry run: orphaned pages that would be deleted.
    pub would_delete: Vec<String>,
    /// Orphaned pages left alone because delete mode is off.
    pub orphans_kept: Vec<String>,
    /// Orphaned pages whose deletion failed, with the error message.
    pub delete_failures: Vec<(String, String)>,
}

impl SyncReport {
    /// Number of documents with the given outcome kind.
    pub fn count(&self, matches: impl Fn(&PageOutcome) -> bool) -> usize {
        self.documents
            .iter()
            .filter(|d| matches(&d.outcome))
            .count()
    }

    /// Documents whose processing failed.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.documents
            .iter()
            .filter(|d| matches!(d.outcome, PageOutcome::Failed(_)))
    }

    /// True if any document or deletion failed.
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some() || !self.delete_failures.is_empty()
    }
}

/// Drives a reconciliation run over the given collaborators.
pub struct Reconciler<'a> {
    pages: &'a dyn PageRepository,
    rewriter: ReferenceRewriter<'a>,
    source: &'a dyn DocumentSource,
    options: SyncOptions,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler.
    #[must_use]
    pub fn new(
        pages: &'a dyn PageRepository,
        attachments: &'a dyn AttachmentProvider,
        source: &'a dyn DocumentSource,
        files: &'a dyn AttachmentFiles,
        options: SyncOptions,
    ) -> Self {
        Self {
            pages,
            rewriter: ReferenceRewriter::new(attachments, files),
            source,
            options,
        }
    }

    /// Run one reconciliation pass.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the remote page index cannot be fetched or
    /// the documents root cannot be enumerated. Nothing is written in that case.
    pub fn run(&self) -> Result<SyncReport, SyncError> {
        let snapshot: BTreeMap<String, RemotePage> = self
            .pages
            .list_pages()?
            .into_iter()
            .map(|page| (page.name.clone(), page))
            .collect();
        let documents = self.source.scan()?;
        info!(
            "Found {} remote pages and {} local documents",
            snapshot.len(),
            documents.len()
        );

        let mut report = SyncReport::default();
        let mut known = snapshot.clone();
        let mut processed = BTreeSet::new();

        for doc in &documents {
            processed.insert(doc.logical_name.clone());
            info!("Processing page: {}", doc.logical_name);

            let outcome = match self.sync_document(doc, known.get(&doc.logical_name)) {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!("Failed to process {}: {}", doc.logical_name, err);
                    PageOutcome::Failed(err.to_string())
                }
            };
            if let PageOutcome::Created(id) = outcome {
                known.insert(
                    doc.logical_name.clone(),
                    RemotePage {
                        id,
                        name: doc.logical_name.clone(),
                    },
                );
            }
            report.documents.push(DocumentOutcome {
                logical_name: doc.logical_name.clone(),
                outcome,
            });
        }

        self.prune(&snapshot, &processed, &mut report);
        Ok(report)
    }

    fn sync_document(
        &self,
        doc: &DocumentRef,
        existing: Option<&RemotePage>,
    ) -> Result<PageOutcome, DocumentError> {
        let document = Document {
            logical_name: doc.logical_name.clone(),
            raw_content: self.source.read(doc)?,
        };
        match existing {
            Some(page) => self.update_existing(page.id, &document),
            None => self.create(&document),
        }
    }

    /// Update the page only when its normalized content differs.
    ///
    /// The remote side is expected to already use attachment references, so
    /// only the local side is rewritten before comparing.
    fn update_existing(&self, id: PageId, doc: &Document) -> Result<PageOutcome, DocumentError> {
        let (name, raw) = (doc.logical_name.as_str(), doc.raw_content.as_str());
        let remote = self.pages.page_content(id)?;
        let local = normalize(&self.rewriter.rewrite(&normalize(raw), id, false)?);

        if local == normalize(&remote) {
            info!("No changes detected for wiki page: {}", name);
            return Ok(PageOutcome::Unchanged);
        }

        info!("Content changed for wiki page: {}", name);
        if self.options.dry_run {
            return Ok(PageOutcome::WouldUpdate);
        }

        let content = self.rewriter.rewrite(raw, id, true)?;
        self.pages.update_page(id, name, &content)?;
        info!("Updated wiki page: {}", name);
        Ok(PageOutcome::Updated)
    }

    /// Create the page with raw content, then rewrite against its new id.
    ///
    /// Attachments can only be bound once the page id exists.
    fn create(&self, doc: &Document) -> Result<PageOutcome, DocumentError> {
        let (name, raw) = (doc.logical_name.as_str(), doc.raw_content.as_str());
        if self.options.dry_run {
            info!("Wiki page would be created: {}", name);
            return Ok(PageOutcome::WouldCreate);
        }

        let page = self.pages.create_page(name, raw)?;
        let content = self.rewriter.rewrite(raw, page.id, true)?;
        self.pages.update_page(page.id, name, &content)?;
        info!("Created wiki page: {}", name);
        Ok(PageOutcome::Created(page.id))
    }

    /// Handle pages from the snapshot that no document was processed for.
    fn prune(
        &self,
        snapshot: &BTreeMap<String, RemotePage>,
        processed: &BTreeSet<String>,
        report: &mut SyncReport,
    ) {
        let orphans = snapshot
            .values()
            .filter(|page| !processed.contains(&page.name));

        if !self.options.delete_mode {
            report.orphans_kept = orphans.map(|page| page.name.clone()).collect();
            info!("Delete mode is disabled. Skipping deletion of removed pages.");
            return;
        }

        for page in orphans {
            if self.options.dry_run {
                info!("Wiki page would be deleted: {}", page.name);
                report.would_delete.push(page.name.clone());
                continue;
            }
            match self.pages.delete_page(page.id) {
                Ok(()) => {
                    info!("Deleted wiki page: {}", page.name);
                    report.deleted.push(page.name.clone());
                }
                Err(err) => {
                    error!("Failed to delete {}: {}", page.name, err);
                    report
                        .delete_failures
                        .push((page.name.clone(), err.to_string()));
                }
            }
        }
    }
}
