//! Data model shared by the reconciler and its collaborators.

use std::fmt;
use std::path::PathBuf;

/// Remote page identifier assigned by the wiki service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Attachment identifier, scoped to the page it is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachmentId(pub u64);

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Location of a local Markdown document, produced by a scan.
///
/// Content is not read at this stage; see [`crate::DocumentSource::read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    /// Relative path without `.md`, separators normalized to `/`
    /// (e.g. `"guide"`, `"team/onboarding"`). Key for matching remote pages.
    pub logical_name: String,
    /// Where the source backend finds the content.
    pub path: PathBuf,
}

/// A local Markdown document with its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Logical name, see [`DocumentRef::logical_name`].
    pub logical_name: String,
    /// File text at read time.
    pub raw_content: String,
}

/// A page in the remote wiki. Content is fetched lazily by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePage {
    /// Page ID.
    pub id: PageId,
    /// Page name, compared against [`Document::logical_name`].
    pub name: String,
}

/// A file bound to a remote page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Attachment ID.
    pub id: AttachmentId,
    /// File base name, the de-duplication key within one page.
    pub name: String,
}
