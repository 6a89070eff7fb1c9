//! Rewriting of local file references into attachment references.
//!
//! Documents refer to local files as `![alt](/files/pic.png)` (image) or
//! `[text](/files/spec.pdf)` (file link). The wiki renders
//! `![alt][123]` / `[text][123]`, where `123` is an attachment bound to the
//! same page. Only paths starting with `/files/` are touched.
//!
//! Rewriting is two-phase: all references are found in the unmodified text
//! first, then each original span is substituted in the working copy.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, error, info, warn};

use crate::error::RemoteError;
use crate::ports::{AttachmentFiles, AttachmentProvider};
use crate::types::{AttachmentId, PageId};

const IMAGE_PATTERN: &str = r"!\[(.*?)\]\((/files/.*)\)";

/// File links share the image shape minus the leading `!`, which is checked
/// separately since `regex` has no look-behind.
const FILE_LINK_PATTERN: &str = r"\[(.*?)\]\((/files/.*)\)";

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IMAGE_PATTERN).expect("invalid image regex"));

static FILE_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(FILE_LINK_PATTERN).expect("invalid link regex"));

/// Kind of local reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `![alt](/files/...)`
    Image,
    /// `[text](/files/...)` not preceded by `!`
    FileLink,
}

/// A `/files/` reference found in document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Image or file link.
    pub kind: ReferenceKind,
    /// Alt text or link text.
    pub display_text: String,
    /// Captured path, starting with `/files/`.
    pub path: String,
    /// Entire matched span in the original text.
    pub original: String,
    /// Base name of `path`; empty when the path has none.
    pub target_file_name: String,
}

impl Reference {
    fn from_captures(kind: ReferenceKind, caps: &Captures<'_>) -> Self {
        let path = caps[2].to_owned();
        let target_file_name = Path::new(&path)
            .file_name()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or_default()
            .to_owned();
        Self {
            kind,
            display_text: caps[1].to_owned(),
            original: caps[0].to_owned(),
            path,
            target_file_name,
        }
    }

    /// Native attachment reference for this occurrence.
    #[must_use]
    pub fn replacement(&self, id: AttachmentId) -> String {
        match self.kind {
            ReferenceKind::Image => format!("![{}][{}]", self.display_text, id),
            ReferenceKind::FileLink => format!("[{}][{}]", self.display_text, id),
        }
    }
}

/// Find all `/files/` references, images first, each kind in text order.
#[must_use]
pub fn find_references(text: &str) -> Vec<Reference> {
    let mut references: Vec<_> = IMAGE_RE
        .captures_iter(text)
        .map(|caps| Reference::from_captures(ReferenceKind::Image, &caps))
        .collect();
    references.extend(find_file_links(text));
    references
}

/// Non-overlapping scan for file links, rejecting candidates right after `!`.
///
/// A rejected candidate only advances the search by one byte (`[` is ASCII),
/// so a file link nested later inside the rejected span is still found.
fn find_file_links(text: &str) -> Vec<Reference> {
    let mut links = Vec::new();
    let mut pos = 0;
    while let Some(caps) = FILE_LINK_RE.captures_at(text, pos) {
        let Some(span) = caps.get(0) else { break };
        if text[..span.start()].ends_with('!') {
            pos = span.start() + 1;
            continue;
        }
        links.push(Reference::from_captures(ReferenceKind::FileLink, &caps));
        pos = span.end();
    }
    links
}

/// Rewrites `/files/` references into attachment references of one page.
pub struct ReferenceRewriter<'a> {
    attachments: &'a dyn AttachmentProvider,
    files: &'a dyn AttachmentFiles,
}

impl<'a> ReferenceRewriter<'a> {
    /// Create a rewriter over the given collaborators.
    #[must_use]
    pub fn new(attachments: &'a dyn AttachmentProvider, files: &'a dyn AttachmentFiles) -> Self {
        Self { attachments, files }
    }

    /// Rewrite every resolvable reference in `text` for page `page`.
    ///
    /// Attachments already bound to the page are reused by file name. Missing
    /// ones are uploaded only when `allow_upload` is set; otherwise the
    /// reference is left as is, so a call with `allow_upload == false` never
    /// changes remote state. A file name is uploaded at most once per call.
    ///
    /// References to files that do not exist locally, unreadable files and
    /// malformed upload responses leave that reference unchanged.
    ///
    /// # Errors
    ///
    /// Returns the remote error when listing attachments fails or an upload
    /// fails for reasons other than a malformed response.
    pub fn rewrite(
        &self,
        text: &str,
        page: PageId,
        allow_upload: bool,
    ) -> Result<String, RemoteError> {
        let mut known: HashMap<String, AttachmentId> = self
            .attachments
            .list_attachments(page)?
            .into_iter()
            .map(|att| (att.name, att.id))
            .collect();

        let references = find_references(text);
        let images = references
            .iter()
            .filter(|r| r.kind == ReferenceKind::Image)
            .count();
        info!("Found {} image references in content", images);
        info!(
            "Found {} file references in content",
            references.len() - images
        );

        let mut content = text.to_owned();
        for reference in &references {
            let Some(id) = self.resolve(reference, page, allow_upload, &mut known)? else {
                continue;
            };
            let replacement = reference.replacement(id);
            info!(
                "Replacing reference: {} -> {}",
                reference.original, replacement
            );
            content = content.replace(&reference.original, &replacement);
        }

        Ok(content)
    }

    /// Resolve the attachment id for one reference, uploading if allowed.
    fn resolve(
        &self,
        reference: &Reference,
        page: PageId,
        allow_upload: bool,
        known: &mut HashMap<String, AttachmentId>,
    ) -> Result<Option<AttachmentId>, RemoteError> {
        let name = reference.target_file_name.as_str();
        if name.is_empty() || !self.files.exists(name) {
            warn!(
                "File not found: {} (referenced as {})",
                name, reference.path
            );
            return Ok(None);
        }

        if let Some(&id) = known.get(name) {
            info!("File {} already attached with ID {}", name, id);
            return Ok(Some(id));
        }

        if !allow_upload {
            debug!("File {} not attached to page {} yet", name, page);
            return Ok(None);
        }

        let data = match self.files.read(name) {
            Ok(data) => data,
            Err(err) => {
                error!("Failed to read file {}: {}", name, err);
                return Ok(None);
            }
        };

        info!("Uploading file {} to page {}", name, page);
        match self.attachments.upload_attachment(page, name, &data) {
            Ok(attachment) => {
                known.insert(name.to_owned(), attachment.id);
                Ok(Some(attachment.id))
            }
            Err(err) if err.is_malformed() => {
                error!("Unexpected attachment response for {}: {}", name, err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
