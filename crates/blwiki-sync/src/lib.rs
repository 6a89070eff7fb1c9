//! Reconciliation engine mirroring a Markdown tree onto a Backlog wiki.
//!
//! This crate holds everything that is not HTTP plumbing:
//!
//! - [`normalize`] canonicalizes text for equivalence checks
//! - [`ReferenceRewriter`] turns `/files/` links into attachment references,
//!   reusing or uploading attachments
//! - [`Reconciler`] decides create/update/skip per document and prunes orphans
//! - [`PageRepository`], [`AttachmentProvider`], [`DocumentSource`] and
//!   [`AttachmentFiles`] are the collaborator seams
//! - [`FsSource`] and [`FsAttachments`] implement the local side
//! - `mock` holds in-memory collaborators (behind the `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use blwiki_sync::{FsAttachments, FsSource, Reconciler, SyncOptions};
//!
//! let source = FsSource::new(PathBuf::from("docs"));
//! let files = FsAttachments::new(PathBuf::from("files"));
//! let reconciler = Reconciler::new(&client, &client, &source, &files, SyncOptions::default());
//! let report = reconciler.run()?;
//! ```

mod error;
mod fs;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod normalize;
mod ports;
mod reconcile;
mod rewrite;
mod types;

pub use error::{DocumentError, RemoteError, SourceError, SyncError};
pub use fs::{FsAttachments, FsSource};
pub use normalize::normalize;
pub use ports::{AttachmentFiles, AttachmentProvider, DocumentSource, PageRepository};
pub use reconcile::{DocumentOutcome, PageOutcome, Reconciler, SyncOptions, SyncReport};
pub use rewrite::{Reference, ReferenceKind, ReferenceRewriter, find_references};
pub use types::{Attachment, AttachmentId, Document, DocumentRef, PageId, RemotePage};
