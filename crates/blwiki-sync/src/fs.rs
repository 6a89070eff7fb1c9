//! Filesystem-backed documents and attachment files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::ports::{AttachmentFiles, DocumentSource};
use crate::types::DocumentRef;

/// Version control metadata directories never scanned for documents.
const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// Markdown documents under a root directory.
///
/// Every `*.md` file below the root is a document, including files in
/// dot-directories. Only version control metadata directories are skipped.
pub struct FsSource {
    docs_dir: PathBuf,
}

impl FsSource {
    /// Create a source rooted at `docs_dir`.
    #[must_use]
    pub fn new(docs_dir: PathBuf) -> Self {
        Self { docs_dir }
    }

    fn scan_directory(
        &self,
        dir_path: &Path,
        refs: &mut Vec<DocumentRef>,
    ) -> Result<(), SourceError> {
        let entries = fs::read_dir(dir_path).map_err(|e| SourceError::io(dir_path, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| SourceError::io(dir_path, e))?;
            let path = entry.path();
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            if is_dir {
                let name = entry.file_name();
                if VCS_DIRS.iter().any(|vcs| name == *vcs) {
                    continue;
                }
                self.scan_directory(&path, refs)?;
            } else if path.extension().is_some_and(|e| e == "md") {
                let rel_path = path.strip_prefix(&self.docs_dir).unwrap_or(&path);
                refs.push(DocumentRef {
                    logical_name: logical_name(rel_path),
                    path,
                });
            }
        }
        Ok(())
    }
}

impl DocumentSource for FsSource {
    fn scan(&self) -> Result<Vec<DocumentRef>, SourceError> {
        if !self.docs_dir.is_dir() {
            return Err(SourceError::NotFound(self.docs_dir.clone()));
        }
        let mut refs = Vec::new();
        self.scan_directory(&self.docs_dir, &mut refs)?;
        refs.sort_by(|a, b| a.logical_name.cmp(&b.logical_name));
        Ok(refs)
    }

    fn read(&self, doc: &DocumentRef) -> Result<String, SourceError> {
        fs::read_to_string(&doc.path).map_err(|e| SourceError::io(&doc.path, e))
    }
}

/// Convert a path relative to the documents root into a logical name.
///
/// - `guide.md` -> `"guide"`
/// - `team/onboarding.md` -> `"team/onboarding"`
/// - `team\onboarding.md` -> `"team/onboarding"`
pub(crate) fn logical_name(rel_path: &Path) -> String {
    let path_str = rel_path.to_string_lossy().replace('\\', "/");
    path_str
        .strip_suffix(".md")
        .unwrap_or(&path_str)
        .to_owned()
}

/// Attachment files in a flat directory, addressed by base name.
pub struct FsAttachments {
    files_dir: PathBuf,
}

impl FsAttachments {
    /// Create an attachment store rooted at `files_dir`.
    #[must_use]
    pub fn new(files_dir: PathBuf) -> Self {
        Self { files_dir }
    }

    fn path_for(&self, file_name: &str) -> PathBuf {
        self.files_dir.join(file_name)
    }
}

impl AttachmentFiles for FsAttachments {
    fn exists(&self, file_name: &str) -> bool {
        let path = self.path_for(file_name);
        tracing::debug!("Looking for file at: {}", path.display());
        path.is_file()
    }

    fn read(&self, file_name: &str) -> Result<Vec<u8>, SourceError> {
        let path = self.path_for(file_name);
        fs::read(&path).map_err(|e| SourceError::io(path, e))
    }
}
