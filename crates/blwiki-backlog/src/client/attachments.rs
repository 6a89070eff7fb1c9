//! Attachment operations for Backlog API.
//!
//! Backlog binds files to wiki pages in two steps: the file is uploaded to
//! the space, which yields a temporary id, and that id is then attached to
//! the page, which yields the page-scoped attachment.

use rand::RngExt;
use tracing::info;

use super::BacklogClient;
use crate::error::BacklogError;
use crate::types::{SpaceAttachment, WikiAttachment};

impl BacklogClient {
    /// List attachments on a wiki page.
    pub(crate) fn get_wiki_attachments(
        &self,
        wiki_id: u64,
    ) -> Result<Vec<WikiAttachment>, BacklogError> {
        let url = self.url(&format!("wikis/{wiki_id}/attachments"));
        info!("Getting attachments for wiki page {}", wiki_id);

        let response = self
            .agent
            .get(&url)
            .query("apiKey", &self.api_key)
            .header("Accept", "application/json")
            .call()?;

        self.read_json(response)
    }

    /// Upload a file to the space and return its temporary id.
    pub(crate) fn upload_to_space(&self, filename: &str, data: &[u8]) -> Result<u64, BacklogError> {
        let url = self.url("space/attachment");
        info!("Uploading file to space: {}", filename);

        let boundary = format!("----BlwikiFormBoundary{:016x}", rand::rng().random::<u64>());
        let body = multipart_body(&boundary, filename, data);

        let response = self
            .agent
            .post(&url)
            .query("apiKey", &self.api_key)
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .header("Accept", "application/json")
            .send(&body[..])?;

        let text = self.read_body(response)?;
        let uploaded: SpaceAttachment = serde_json::from_str(&text)?;
        info!(
            "Space attachment response: id={:?} name={:?}",
            uploaded.id, uploaded.name
        );
        uploaded
            .id
            .ok_or_else(|| BacklogError::MissingId(self.scrub(&text)))
    }

    /// Bind a space attachment to a wiki page.
    pub(crate) fn attach_to_wiki(
        &self,
        wiki_id: u64,
        attachment_id: u64,
    ) -> Result<WikiAttachment, BacklogError> {
        let url = self.url(&format!("wikis/{wiki_id}/attachments"));
        info!(
            "Attaching file to wiki page {} with attachment ID {}",
            wiki_id, attachment_id
        );

        let attachment_id = attachment_id.to_string();
        let response = self
            .agent
            .post(&url)
            .query("apiKey", &self.api_key)
            .header("Accept", "application/json")
            .send_form([("attachmentId[]", attachment_id.as_str())])?;

        let attached: Vec<WikiAttachment> = self.read_json(response)?;
        attached
            .into_iter()
            .next()
            .ok_or_else(|| BacklogError::MissingId("empty attachment list".to_owned()))
    }
}

/// Build a `multipart/form-data` body with a single `file` part.
fn multipart_body(boundary: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let filename = filename.replace('"', "%22");
    let mut body = Vec::with_capacity(data.len() + 256);

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}
