//! Backlog wiki page types.

use serde::Deserialize;

use blwiki_sync::{PageId, RemotePage};

/// Backlog wiki page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiPage {
    /// Page ID.
    pub id: u64,
    /// Page name (slash-separated path).
    pub name: String,
    /// Page content. Present on single-page responses.
    #[serde(default)]
    pub content: Option<String>,
}

impl From<WikiPage> for RemotePage {
    fn from(page: WikiPage) -> Self {
        Self {
            id: PageId(page.id),
            name: page.name,
        }
    }
}
