//! Collaborator trait implementations for [`BacklogClient`].

use blwiki_sync::{Attachment, AttachmentProvider, PageId, PageRepository, RemoteError, RemotePage};

use crate::client::BacklogClient;

impl PageRepository for BacklogClient {
    fn list_pages(&self) -> Result<Vec<RemotePage>, RemoteError> {
        Ok(self
            .get_wikis()?
            .into_iter()
            .map(RemotePage::from)
            .collect())
    }

    fn page_content(&self, id: PageId) -> Result<String, RemoteError> {
        Ok(self.get_wiki(id.0)?.content.unwrap_or_default())
    }

    fn create_page(&self, name: &str, content: &str) -> Result<RemotePage, RemoteError> {
        Ok(self.create_wiki(name, content)?.into())
    }

    fn update_page(
        &self,
        id: PageId,
        name: &str,
        content: &str,
    ) -> Result<RemotePage, RemoteError> {
        Ok(self.update_wiki(id.0, name, content)?.into())
    }

    fn delete_page(&self, id: PageId) -> Result<(), RemoteError> {
        self.delete_wiki(id.0).map_err(RemoteError::from)
    }
}

impl AttachmentProvider for BacklogClient {
    fn list_attachments(&self, page: PageId) -> Result<Vec<Attachment>, RemoteError> {
        Ok(self
            .get_wiki_attachments(page.0)?
            .into_iter()
            .map(Attachment::from)
            .collect())
    }

    fn upload_attachment(
        &self,
        page: PageId,
        file_name: &str,
        data: &[u8],
    ) -> Result<Attachment, RemoteError> {
        let space_id = self.upload_to_space(file_name, data)?;
        Ok(self.attach_to_wiki(page.0, space_id)?.into())
    }
}
