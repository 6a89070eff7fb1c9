//! Backlog API response types.
//!
//! Only fields that are actually used are declared; serde ignores the rest.

mod attachment;
mod project;
mod wiki;

pub use attachment::{SpaceAttachment, WikiAttachment};
pub use project::Project;
pub use wiki::WikiPage;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use blwiki_sync::{Attachment, AttachmentId, PageId, RemotePage};

    use super::*;

    #[test]
    fn test_wiki_page_list_item_without_content() {
        let json = r#"[{"id": 112, "projectId": 1, "name": "guide/setup", "tags": []}]"#;
        let pages: Vec<WikiPage> = serde_json::from_str(json).unwrap();

        assert_eq!(pages[0].content, None);
        let remote: RemotePage = pages[0].clone().into();
        assert_eq!(
            remote,
            RemotePage {
                id: PageId(112),
                name: "guide/setup".to_owned(),
            }
        );
    }

    #[test]
    fn test_wiki_page_with_content() {
        let json = r##"{"id": 1, "name": "Home", "content": "# Home\n![a][5]"}"##;
        let page: WikiPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.content.as_deref(), Some("# Home\n![a][5]"));
    }

    #[test]
    fn test_wiki_attachment_into_attachment() {
        let json = r#"[{"id": 5, "name": "pic.png", "size": 196186}]"#;
        let attachments: Vec<WikiAttachment> = serde_json::from_str(json).unwrap();
        let attachment: Attachment = attachments[0].clone().into();
        assert_eq!(attachment.id, AttachmentId(5));
        assert_eq!(attachment.name, "pic.png");
    }

    #[test]
    fn test_space_attachment_without_id() {
        let uploaded: SpaceAttachment = serde_json::from_str(r#"{"name": "a.txt"}"#).unwrap();
        assert_eq!(uploaded.id, None);
    }

    #[test]
    fn test_project() {
        let project: Project =
            serde_json::from_str(r#"{"id": 7, "projectKey": "DOCS", "name": "Docs"}"#).unwrap();
        assert_eq!(project.id, 7);
        assert_eq!(project.project_key, "DOCS");
    }
}
