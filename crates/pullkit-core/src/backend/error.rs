//! Error type for the backend client.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The credential file could not be read.
    #[error("read credential {}: {source}", path.display())]
    CredentialIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The credential file is not valid JSON for a service-account key.
    #[error("parse credential: {0}")]
    CredentialParse(#[source] serde_json::Error),

    /// The credential parsed but is unusable (wrong type, missing fields, bad key).
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    #[error("app {0:?} is already initialized")]
    AlreadyInitialized(String),

    /// The token endpoint rejected the assertion or returned garbage.
    #[error("access token request failed: {0}")]
    Token(String),

    #[error("bucket {0} does not exist")]
    BucketNotFound(String),

    #[error("object {object} not found in bucket {bucket}")]
    ObjectNotFound { bucket: String, object: String },

    /// Document paths alternate collection/document and must end on a document.
    #[error("invalid document path {0:?}")]
    InvalidDocumentPath(String),

    #[error("{url} returned HTTP {status}")]
    Status { status: u32, url: String },

    #[error("request to {url} failed: {source}")]
    Transfer {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
