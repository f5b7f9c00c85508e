//! Document database handle (REST v1).

use super::http::{self, Request};
use super::{BackendApp, BackendError, PATH_SEGMENT};
use percent_encoding::utf8_percent_encode;

/// Handle to the `(default)` document database of an app's project.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    app: BackendApp,
}

impl DocumentStore {
    pub(crate) fn new(app: BackendApp) -> Self {
        DocumentStore { app }
    }

    pub fn app(&self) -> &BackendApp {
        &self.app
    }

    /// Resource name of the database, e.g. `projects/p/databases/(default)`.
    pub fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)", self.app.project_id())
    }

    /// REST URL of the document at `path` (`collection/doc[/collection/doc...]`).
    pub fn document_url(&self, path: &str) -> Result<String, BackendError> {
        let segments = split_document_path(path)?;
        let encoded: Vec<String> = segments
            .iter()
            .map(|s| utf8_percent_encode(s, PATH_SEGMENT).to_string())
            .collect();
        Ok(format!(
            "{}/v1/{}/documents/{}",
            self.app.firestore_endpoint(),
            self.database_path(),
            encoded.join("/")
        ))
    }

    /// Fetches the document at `path` in its REST representation
    /// (`name`, `fields`, `createTime`, `updateTime`). A missing document is `Ok(None)`.
    pub fn get_document(&self, path: &str) -> Result<Option<serde_json::Value>, BackendError> {
        let url = self.document_url(path)?;
        let bearer = self.app.bearer()?;
        let resp = http::send(&Request {
            url: &url,
            bearer: bearer.as_deref(),
            form: None,
            timeout: self.app.request_timeout(),
        })?;
        match resp.status {
            404 => Ok(None),
            _ if resp.is_success() => resp.json(&url).map(Some),
            status => Err(BackendError::Status { status, url }),
        }
    }
}

/// Splits a document path, requiring an even, non-zero number of non-empty segments.
fn split_document_path(path: &str) -> Result<Vec<&str>, BackendError> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    if segments.iter().any(|s| s.is_empty()) || segments.len() % 2 != 0 {
        return Err(BackendError::InvalidDocumentPath(path.to_string()));
    }
    Ok(segments)
}
