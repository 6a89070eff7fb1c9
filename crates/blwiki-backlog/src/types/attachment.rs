//! Backlog attachment types.

use serde::Deserialize;

use blwiki_sync::{Attachment, AttachmentId};

/// Attachment bound to a wiki page.
#[derive(Debug, Clone, Deserialize)]
pub struct WikiAttachment {
    /// Attachment ID.
    pub id: u64,
    /// File name.
    pub name: String,
}

impl From<WikiAttachment> for Attachment {
    fn from(att: WikiAttachment) -> Self {
        Self {
            id: AttachmentId(att.id),
            name: att.name,
        }
    }
}

/// Response of a space-level upload.
///
/// `id` is optional so a response without it can be reported instead of
/// failing deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct SpaceAttachment {
    /// Temporary attachment ID used to bind the file to a page.
    #[serde(default)]
    pub id: Option<u64>,
    /// File name.
    #[serde(default)]
    pub name: Option<String>,
}
