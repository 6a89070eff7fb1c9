//! Backlog REST API v2 client.
//!
//! Provides a sync HTTP client authenticated with a static API key, sent as
//! the `apiKey` query parameter on every request.

mod attachments;
mod pages;

use std::sync::OnceLock;
use std::time::Duration;

use serde::de::DeserializeOwned;
use ureq::http::Response;
use ureq::{Agent, Body};

use blwiki_config::BacklogConfig;

use crate::error::{BacklogError, mask_api_key};
use crate::types::Project;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Backlog REST API client bound to one project.
pub struct BacklogClient {
    agent: Agent,
    base_url: String,
    api_key: String,
    project: String,
    project_id: OnceLock<u64>,
}

impl BacklogClient {
    /// Create client.
    ///
    /// # Arguments
    /// * `base_url` - API base URL, e.g. `https://acme.backlog.jp/api/v2`
    /// * `project` - Project numeric id or project key
    /// * `api_key` - API key
    #[must_use]
    pub fn new(base_url: &str, project: &str, api_key: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            project: project.to_owned(),
            project_id: OnceLock::new(),
        }
    }

    /// Create client from validated configuration.
    #[must_use]
    pub fn from_config(config: &BacklogConfig) -> Self {
        Self::new(&config.base_url(), &config.project_id, &config.api_key)
    }

    /// Build an endpoint URL.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Remove every trace of the API key from text destined for errors or logs.
    pub(crate) fn scrub(&self, text: &str) -> String {
        let masked = mask_api_key(text);
        if self.api_key.is_empty() {
            return masked;
        }
        masked.replace(&self.api_key, "***")
    }

    /// Read the response body, turning error statuses into [`BacklogError::HttpResponse`].
    fn read_body(&self, response: Response<Body>) -> Result<String, BacklogError> {
        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(BacklogError::HttpResponse {
                status,
                body: self.scrub(&error_body),
            });
        }

        Ok(body.read_to_string()?)
    }

    /// Read and deserialize a JSON response body.
    fn read_json<T: DeserializeOwned>(&self, response: Response<Body>) -> Result<T, BacklogError> {
        let text = self.read_body(response)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Numeric project id, resolved through the API once if a key was configured.
    fn numeric_project_id(&self) -> Result<u64, BacklogError> {
        if let Some(id) = self.project_id.get() {
            return Ok(*id);
        }
        let id = match self.project.parse::<u64>() {
            Ok(id) => id,
            Err(_) => self.get_project()?.id,
        };
        let _ = self.project_id.set(id);
        Ok(id)
    }

    /// Fetch the configured project.
    fn get_project(&self) -> Result<Project, BacklogError> {
        let url = self.url(&format!("projects/{}", self.project));
        tracing::info!("Resolving project {}", self.project);

        let response = self
            .agent
            .get(&url)
            .query("apiKey", &self.api_key)
            .header("Accept", "application/json")
            .call()?;

        let project: Project = self.read_json(response)?;
        tracing::info!("Project {} has id {}", project.project_key, project.id);
        Ok(project)
    }
}
