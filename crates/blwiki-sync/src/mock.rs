//! In-memory collaborators for testing.
//!
//! [`MockWiki`] implements both remote ports and records every call.
//! [`MockSource`] implements both local ports.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{RemoteError, SourceError};
use crate::ports::{AttachmentFiles, AttachmentProvider, DocumentSource, PageRepository};
use crate::types::{Attachment, AttachmentId, DocumentRef, PageId, RemotePage};

/// First id handed out for pages created through the mock.
const FIRST_PAGE_ID: u64 = 1000;

/// First id handed out for uploaded attachments.
const FIRST_ATTACHMENT_ID: u64 = 5000;

/// A recorded call against [`MockWiki`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WikiCall {
    /// `list_pages`
    ListPages,
    /// `page_content`
    PageContent(PageId),
    /// `create_page`
    CreatePage {
        /// Page name.
        name: String,
        /// Submitted content.
        content: String,
    },
    /// `update_page`
    UpdatePage {
        /// Page ID.
        id: PageId,
        /// Page name.
        name: String,
        /// Submitted content.
        content: String,
    },
    /// `delete_page`
    DeletePage(PageId),
    /// `list_attachments`
    ListAttachments(PageId),
    /// `upload_attachment`
    Upload {
        /// Target page.
        page: PageId,
        /// Uploaded file name.
        file_name: String,
    },
}

#[derive(Debug, Default)]
struct WikiState {
    pages: BTreeMap<PageId, (String, String)>,
    attachments: HashMap<PageId, Vec<Attachment>>,
    calls: Vec<WikiCall>,
    next_page_id: u64,
    next_attachment_id: u64,
}

#[derive(Debug, Default)]
struct Failures {
    list_pages: bool,
    content: HashSet<PageId>,
    attachments: HashSet<PageId>,
    deletes: HashSet<PageId>,
    malformed_uploads: HashSet<String>,
    uploads: HashSet<String>,
}

/// In-memory wiki recording every call.
///
/// # Example
///
/// ```ignore
/// use blwiki_sync::mock::MockWiki;
/// use blwiki_sync::PageId;
///
/// let wiki = MockWiki::new()
///     .with_page(PageId(1), "guide", "# Guide")
///     .with_failing_delete(PageId(1));
/// ```
#[derive(Debug)]
pub struct MockWiki {
    state: RwLock<WikiState>,
    failures: Failures,
}

impl Default for MockWiki {
    fn default() -> Self {
        Self {
            state: RwLock::new(WikiState {
                next_page_id: FIRST_PAGE_ID,
                next_attachment_id: FIRST_ATTACHMENT_ID,
                ..WikiState::default()
            }),
            failures: Failures::default(),
        }
    }
}

fn server_error() -> RemoteError {
    RemoteError::Http {
        status: 500,
        body: "internal error".to_owned(),
    }
}

impl MockWiki {
    /// Create an empty wiki.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an existing page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(
        self,
        id: PageId,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.state
            .write()
            .unwrap()
            .pages
            .insert(id, (name.into(), content.into()));
        self
    }

    /// Bind an existing attachment to a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_attachment(self, page: PageId, id: AttachmentId, name: impl Into<String>) -> Self {
        self.state
            .write()
            .unwrap()
            .attachments
            .entry(page)
            .or_default()
            .push(Attachment {
                id,
                name: name.into(),
            });
        self
    }

    /// Make `list_pages` fail.
    #[must_use]
    pub fn with_failing_list(mut self) -> Self {
        self.failures.list_pages = true;
        self
    }

    /// Make `page_content` fail for a page.
    #[must_use]
    pub fn with_failing_content(mut self, id: PageId) -> Self {
        self.failures.content.insert(id);
        self
    }

    /// Make `list_attachments` fail for a page.
    #[must_use]
    pub fn with_failing_attachments(mut self, id: PageId) -> Self {
        self.failures.attachments.insert(id);
        self
    }

    /// Make `delete_page` fail for a page.
    #[must_use]
    pub fn with_failing_delete(mut self, id: PageId) -> Self {
        self.failures.deletes.insert(id);
        self
    }

    /// Make uploads of this file name fail with a server error.
    #[must_use]
    pub fn with_failing_upload(mut self, file_name: impl Into<String>) -> Self {
        self.failures.uploads.insert(file_name.into());
        self
    }

    /// Answer uploads of this file name with a malformed response.
    #[must_use]
    pub fn with_malformed_upload(mut self, file_name: impl Into<String>) -> Self {
        self.failures.malformed_uploads.insert(file_name.into());
        self
    }

    /// All calls in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn calls(&self) -> Vec<WikiCall> {
        self.state.read().unwrap().calls.clone()
    }

    /// Number of `upload_attachment` calls.
    pub fn upload_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, WikiCall::Upload { .. }))
            .count()
    }

    /// Only the page-writing calls (create, update, delete).
    pub fn writes(&self) -> Vec<WikiCall> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    WikiCall::CreatePage { .. }
                        | WikiCall::UpdatePage { .. }
                        | WikiCall::DeletePage(_)
                )
            })
            .collect()
    }

    /// Id of the attachment named `name` on `page`, if bound.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn attachment_id(&self, page: PageId, name: &str) -> Option<AttachmentId> {
        self.state
            .read()
            .unwrap()
            .attachments
            .get(&page)?
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.id)
    }

    /// Current content of a page, if it exists.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn content_of(&self, id: PageId) -> Option<String> {
        self.state
            .read()
            .unwrap()
            .pages
            .get(&id)
            .map(|(_, content)| content.clone())
    }

    /// Id of the page named `name`, if it exists.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn page_id(&self, name: &str) -> Option<PageId> {
        self.state
            .read()
            .unwrap()
            .pages
            .iter()
            .find(|(_, (page_name, _))| page_name == name)
            .map(|(id, _)| *id)
    }

    fn record(&self, call: WikiCall) {
        self.state.write().unwrap().calls.push(call);
    }
}

impl PageRepository for MockWiki {
    fn list_pages(&self) -> Result<Vec<RemotePage>, RemoteError> {
        self.record(WikiCall::ListPages);
        if self.failures.list_pages {
            return Err(server_error());
        }
        Ok(self
            .state
            .read()
            .unwrap()
            .pages
            .iter()
            .map(|(id, (name, _))| RemotePage {
                id: *id,
                name: name.clone(),
            })
            .collect())
    }

    fn page_content(&self, id: PageId) -> Result<String, RemoteError> {
        self.record(WikiCall::PageContent(id));
        if self.failures.content.contains(&id) {
            return Err(server_error());
        }
        self.content_of(id).ok_or_else(|| RemoteError::Http {
            status: 404,
            body: format!("no page {id}"),
        })
    }

    fn create_page(&self, name: &str, content: &str) -> Result<RemotePage, RemoteError> {
        self.record(WikiCall::CreatePage {
            name: name.to_owned(),
            content: content.to_owned(),
        });
        let mut state = self.state.write().unwrap();
        let id = PageId(state.next_page_id);
        state.next_page_id += 1;
        state.pages.insert(id, (name.to_owned(), content.to_owned()));
        Ok(RemotePage {
            id,
            name: name.to_owned(),
        })
    }

    fn update_page(
        &self,
        id: PageId,
        name: &str,
        content: &str,
    ) -> Result<RemotePage, RemoteError> {
        self.record(WikiCall::UpdatePage {
            id,
            name: name.to_owned(),
            content: content.to_owned(),
        });
        let mut state = self.state.write().unwrap();
        let Some(page) = state.pages.get_mut(&id) else {
            return Err(RemoteError::Http {
                status: 404,
                body: format!("no page {id}"),
            });
        };
        *page = (name.to_owned(), content.to_owned());
        Ok(RemotePage {
            id,
            name: name.to_owned(),
        })
    }

    fn delete_page(&self, id: PageId) -> Result<(), RemoteError> {
        self.record(WikiCall::DeletePage(id));
        if self.failures.deletes.contains(&id) {
            return Err(server_error());
        }
        self.state.write().unwrap().pages.remove(&id);
        Ok(())
    }
}

impl AttachmentProvider for MockWiki {
    fn list_attachments(&self, page: PageId) -> Result<Vec<Attachment>, RemoteError> {
        self.record(WikiCall::ListAttachments(page));
        if self.failures.attachments.contains(&page) {
            return Err(server_error());
        }
        Ok(self
            .state
            .read()
            .unwrap()
            .attachments
            .get(&page)
            .cloned()
            .unwrap_or_default())
    }

    fn upload_attachment(
        &self,
        page: PageId,
        file_name: &str,
        _data: &[u8],
    ) -> Result<Attachment, RemoteError> {
        self.record(WikiCall::Upload {
            page,
            file_name: file_name.to_owned(),
        });
        if self.failures.uploads.contains(file_name) {
            return Err(server_error());
        }
        if self.failures.malformed_uploads.contains(file_name) {
            return Err(RemoteError::MalformedResponse(
                "attachment id missing".to_owned(),
            ));
        }
        let mut state = self.state.write().unwrap();
        let attachment = Attachment {
            id: AttachmentId(state.next_attachment_id),
            name: file_name.to_owned(),
        };
        state.next_attachment_id += 1;
        state
            .attachments
            .entry(page)
            .or_default()
            .push(attachment.clone());
        Ok(attachment)
    }
}

/// In-memory documents and attachment files.
#[derive(Debug, Default)]
pub struct MockSource {
    documents: Vec<(String, Option<String>)>,
    files: HashMap<String, Vec<u8>>,
    missing_root: bool,
}

impl MockSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document.
    #[must_use]
    pub fn with_document(
        mut self,
        logical_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.documents
            .push((logical_name.into(), Some(content.into())));
        self
    }

    /// Add a document that is listed by `scan` but fails on `read`.
    #[must_use]
    pub fn with_unreadable_document(mut self, logical_name: impl Into<String>) -> Self {
        self.documents.push((logical_name.into(), None));
        self
    }

    /// Add an attachment file.
    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>, data: &[u8]) -> Self {
        self.files.insert(name.into(), data.to_vec());
        self
    }

    /// Make `scan` fail as if the documents root did not exist.
    #[must_use]
    pub fn with_missing_root(mut self) -> Self {
        self.missing_root = true;
        self
    }
}

impl DocumentSource for MockSource {
    fn scan(&self) -> Result<Vec<DocumentRef>, SourceError> {
        if self.missing_root {
            return Err(SourceError::NotFound(PathBuf::from("docs")));
        }
        Ok(self
            .documents
            .iter()
            .map(|(name, _)| DocumentRef {
                logical_name: name.clone(),
                path: PathBuf::from(format!("docs/{name}.md")),
            })
            .collect())
    }

    fn read(&self, doc: &DocumentRef) -> Result<String, SourceError> {
        self.documents
            .iter()
            .find(|(name, _)| *name == doc.logical_name)
            .and_then(|(_, content)| content.clone())
            .ok_or_else(|| SourceError::NotFound(doc.path.clone()))
    }
}

impl AttachmentFiles for MockSource {
    fn exists(&self, file_name: &str) -> bool {
        self.files.contains_key(file_name)
    }

    fn read(&self, file_name: &str) -> Result<Vec<u8>, SourceError> {
        self.files
            .get(file_name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(PathBuf::from("files").join(file_name)))
    }
}
