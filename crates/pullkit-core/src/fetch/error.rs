//! Error type for the file fetcher.

use std::path::PathBuf;
use thiserror::Error;

/// Failure modes of [`Fetcher::fetch`](super::Fetcher::fetch).
///
/// A non-200 response is not an error; it is reported as `Ok(None)`.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL did not parse after percent-decoding.
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL path has no final segment to use as a file name.
    #[error("URL {url} has no file name in its path")]
    EmptyFileName { url: String },

    /// Directory creation, stale file removal, writing or renaming failed.
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// libcurl failed before a response was complete (connect, timeout, TLS).
    #[error("GET {url} failed: {source}")]
    Transfer {
        url: String,
        #[source]
        source: curl::Error,
    },
}

impl FetchError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| FetchError::Io {
            action,
            path,
            source,
        }
    }
}
