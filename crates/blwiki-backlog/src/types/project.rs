//! Backlog project type.

use serde::Deserialize;

/// Backlog project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Numeric project ID.
    pub id: u64,
    /// Project key, e.g. `DOCS`.
    pub project_key: String,
}
