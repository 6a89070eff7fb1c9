//! Wiki page operations for Backlog API.

use tracing::info;

use super::BacklogClient;
use crate::error::BacklogError;
use crate::types::WikiPage;

impl BacklogClient {
    /// List wiki pages of the configured project.
    pub(crate) fn get_wikis(&self) -> Result<Vec<WikiPage>, BacklogError> {
        let url = self.url("wikis");
        info!("Getting wiki pages for project {}", self.project);

        let response = self
            .agent
            .get(&url)
            .query("apiKey", &self.api_key)
            .query("projectIdOrKey", &self.project)
            .header("Accept", "application/json")
            .call()?;

        let pages: Vec<WikiPage> = self.read_json(response)?;
        info!("Found {} wiki pages", pages.len());
        Ok(pages)
    }

    /// Get a wiki page with its content.
    pub(crate) fn get_wiki(&self, wiki_id: u64) -> Result<WikiPage, BacklogError> {
        let url = self.url(&format!("wikis/{wiki_id}"));

        let response = self
            .agent
            .get(&url)
            .query("apiKey", &self.api_key)
            .header("Accept", "application/json")
            .call()?;

        self.read_json(response)
    }

    /// Create a wiki page.
    pub(crate) fn create_wiki(&self, name: &str, content: &str) -> Result<WikiPage, BacklogError> {
        let url = self.url("wikis");
        let project_id = self.numeric_project_id()?.to_string();
        info!("Creating wiki page '{}'", name);

        let response = self
            .agent
            .post(&url)
            .query("apiKey", &self.api_key)
            .header("Accept", "application/json")
            .send_form([
                ("projectId", project_id.as_str()),
                ("name", name),
                ("content", content),
            ])?;

        self.read_json(response)
    }

    /// Update name and content of a wiki page.
    pub(crate) fn update_wiki(
        &self,
        wiki_id: u64,
        name: &str,
        content: &str,
    ) -> Result<WikiPage, BacklogError> {
        let url = self.url(&format!("wikis/{wiki_id}"));
        info!("Updating wiki page '{}' (id={})", name, wiki_id);

        let response = self
            .agent
            .patch(&url)
            .query("apiKey", &self.api_key)
            .header("Accept", "application/json")
            .send_form([("name", name), ("content", content)])?;

        self.read_json(response)
    }

    /// Delete a wiki page.
    pub(crate) fn delete_wiki(&self, wiki_id: u64) -> Result<(), BacklogError> {
        let url = self.url(&format!("wikis/{wiki_id}"));
        info!("Deleting wiki page {}", wiki_id);

        let response = self
            .agent
            .delete(&url)
            .query("apiKey", &self.api_key)
            .header("Accept", "application/json")
            .call()?;

        self.read_body(response)?;
        Ok(())
    }
}
