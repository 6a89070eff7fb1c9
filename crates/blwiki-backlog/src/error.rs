//! Error types for Backlog integration.
//!
//! Every message that can carry request or response text passes through
//! [`mask_api_key`] before it is stored, so errors are safe to log.

use std::sync::LazyLock;

use regex::Regex;

use blwiki_sync::RemoteError;

const API_KEY_PATTERN: &str = r#"apiKey=[^&"\s]+"#;

static API_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(API_KEY_PATTERN).expect("invalid api key regex"));

/// Replace `apiKey=<value>` query parameters with `apiKey=***`.
#[must_use]
pub fn mask_api_key(text: &str) -> String {
    API_KEY_RE.replace_all(text, "apiKey=***").into_owned()
}

/// Error from Backlog API operations.
#[derive(Debug, thiserror::Error)]
pub enum BacklogError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(String),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body with credentials removed.
        body: String,
    },

    /// I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response did not contain the expected identifier.
    #[error("missing id in response: {0}")]
    MissingId(String),
}

impl From<ureq::Error> for BacklogError {
    fn from(err: ureq::Error) -> Self {
        Self::HttpRequest(mask_api_key(&err.to_string()))
    }
}

impl From<BacklogError> for RemoteError {
    fn from(err: BacklogError) -> Self {
        match err {
            BacklogError::HttpResponse { status, body } => Self::Http { status, body },
            BacklogError::HttpRequest(message) => Self::Transport(message),
            BacklogError::Io(err) => Self::Transport(err.to_string()),
            BacklogError::Json(err) => Self::MalformedResponse(err.to_string()),
            BacklogError::MissingId(message) => Self::MalformedResponse(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_mask_api_key_in_url() {
        assert_eq!(
            mask_api_key("GET https://acme.backlog.jp/api/v2/wikis?apiKey=s3cr3t&projectIdOrKey=1"),
            "GET https://acme.backlog.jp/api/v2/wikis?apiKey=***&projectIdOrKey=1"
        );
    }

    #[test]
    fn test_mask_api_key_in_json_body() {
        assert_eq!(
            mask_api_key(r#"{"url":"/wikis?apiKey=abc"}"#),
            r#"{"url":"/wikis?apiKey=***"}"#
        );
    }

    #[test]
    fn test_mask_leaves_other_text() {
        assert_eq!(mask_api_key("no credentials here"), "no credentials here");
    }

    #[test]
    fn test_into_remote_error() {
        let malformed: RemoteError = BacklogError::MissingId("{}".to_owned()).into();
        assert!(malformed.is_malformed());

        let http: RemoteError = BacklogError::HttpResponse {
            status: 401,
            body: "unauthorized".to_owned(),
        }
        .into();
        assert!(matches!(http, RemoteError::Http { status: 401, .. }));

        let json_err = serde_json::from_str::<u64>("not json").unwrap_err();
        let json: RemoteError = BacklogError::Json(json_err).into();
        assert!(json.is_malformed());
    }
}
