//! Collaborator traits the reconciler depends on.
//!
//! Remote traits are implemented by the Backlog client; local traits by
//! [`crate::FsSource`] and [`crate::FsAttachments`]. In-memory versions live
//! in the `mock` module for tests.

use crate::error::{RemoteError, SourceError};
use crate::types::{Attachment, DocumentRef, PageId, RemotePage};

/// Page-level CRUD against the remote wiki.
pub trait PageRepository {
    /// List every page of the configured project.
    fn list_pages(&self) -> Result<Vec<RemotePage>, RemoteError>;

    /// Fetch the stored content of a page.
    fn page_content(&self, id: PageId) -> Result<String, RemoteError>;

    /// Create a page and return it with its assigned id.
    fn create_page(&self, name: &str, content: &str) -> Result<RemotePage, RemoteError>;

    /// Replace name and content of an existing page.
    fn update_page(&self, id: PageId, name: &str, content: &str)
    -> Result<RemotePage, RemoteError>;

    /// Delete a page.
    fn delete_page(&self, id: PageId) -> Result<(), RemoteError>;
}

/// Attachment listing and upload for remote pages.
pub trait AttachmentProvider {
    /// List attachments bound to a page.
    fn list_attachments(&self, page: PageId) -> Result<Vec<Attachment>, RemoteError>;

    /// Upload a file and bind it to a page.
    ///
    /// Implementations that need several remote calls report any failure
    /// as a single error.
    fn upload_attachment(
        &self,
        page: PageId,
        file_name: &str,
        data: &[u8],
    ) -> Result<Attachment, RemoteError>;
}

/// Local Markdown documents.
pub trait DocumentSource {
    /// Enumerate all documents.
    ///
    /// Fails when the documents root itself is unreadable.
    fn scan(&self) -> Result<Vec<DocumentRef>, SourceError>;

    /// Read the raw text of one document.
    fn read(&self, doc: &DocumentRef) -> Result<String, SourceError>;
}

/// Local files that documents reference as `/files/<name>`.
pub trait AttachmentFiles {
    /// Whether a regular file with this base name exists.
    fn exists(&self, file_name: &str) -> bool;

    /// Read file bytes.
    fn read(&self, file_name: &str) -> Result<Vec<u8>, SourceError>;
}
