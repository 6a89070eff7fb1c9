//! Error types for reconciliation.
//!
//! Failures are split by scope: [`SyncError`] aborts a whole run,
//! [`DocumentError`] is isolated to one document and logged by the reconciler.

use std::path::PathBuf;

/// Error reported by a remote collaborator.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Server returned an error status.
    #[error("HTTP error: {status} - {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, credential-free.
        body: String,
    },

    /// Request could not be completed (connection, timeout, TLS).
    #[error("request failed: {0}")]
    Transport(String),

    /// Response arrived but did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl RemoteError {
    /// True when the service answered but the payload was unusable.
    ///
    /// Such failures are scoped to the single reference being rewritten.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}

/// Error reading local documents or attachment files.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Directory or file does not exist.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::NotFound(path.into());
        }
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure while processing one document. The run continues.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Document text could not be read.
    #[error("{0}")]
    Read(#[from] SourceError),

    /// A remote call for this document failed.
    #[error("{0}")]
    Remote(#[from] RemoteError),
}

/// Failure that aborts the whole run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Documents root could not be enumerated.
    #[error("cannot read documents: {0}")]
    Source(#[from] SourceError),

    /// Remote page index could not be fetched.
    #[error("cannot fetch remote pages: {0}")]
    Remote(#[from] RemoteError),
}
