//! Object storage bucket handle (JSON API v1).

use super::http::{self, Request};
use super::{BackendApp, BackendError, PATH_SEGMENT};
use crate::storage::{self, PartFile};
use percent_encoding::utf8_percent_encode;
use serde::Deserialize;
use std::path::Path;

/// Subset of the bucket resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketMetadata {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub storage_class: Option<String>,
    #[serde(default)]
    pub time_created: Option<String>,
}

/// Handle to a named bucket. Building one does no I/O; a missing bucket is
/// only noticed on first use.
#[derive(Debug, Clone)]
pub struct StorageBucket {
    app: BackendApp,
    name: String,
}

impl StorageBucket {
    pub(crate) fn new(app: BackendApp, name: String) -> Self {
        StorageBucket { app, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn app(&self) -> &BackendApp {
        &self.app
    }

    fn bucket_url(&self) -> String {
        format!(
            "{}/storage/v1/b/{}",
            self.app.storage_endpoint(),
            utf8_percent_encode(&self.name, PATH_SEGMENT)
        )
    }

    /// Media download URL for `object`.
    pub fn object_url(&self, object: &str) -> String {
        format!(
            "{}/o/{}?alt=media",
            self.bucket_url(),
            utf8_percent_encode(object, PATH_SEGMENT)
        )
    }

    /// Fetches the bucket resource. A 404 is `BucketNotFound`.
    pub fn metadata(&self) -> Result<BucketMetadata, BackendError> {
        let url = self.bucket_url();
        let bearer = self.app.bearer()?;
        let resp = http::send(&Request {
            url: &url,
            bearer: bearer.as_deref(),
            form: None,
            timeout: self.app.request_timeout(),
        })?;
        match resp.status {
            404 => Err(BackendError::BucketNotFound(self.name.clone())),
            _ if resp.is_success() => resp.json(&url),
            status => Err(BackendError::Status { status, url }),
        }
    }

    pub fn exists(&self) -> Result<bool, BackendError> {
        match self.metadata() {
            Ok(_) => Ok(true),
            Err(BackendError::BucketNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Streams `object` into `dest` through a `.part` file. Returns the number
    /// of bytes written. Nothing is left at `dest` on failure.
    pub fn download_object(&self, object: &str, dest: &Path) -> Result<u64, BackendError> {
        let url = self.object_url(object);
        let bearer = self.app.bearer()?;

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            storage::ensure_dir(parent).map_err(|source| BackendError::Io {
                action: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let part_path = storage::temp_path(dest);
        let mut part = PartFile::create(&part_path, crate::fetch::DEFAULT_CHUNK_SIZE).map_err(
            |source| BackendError::Io {
                action: "create",
                path: part_path.clone(),
                source,
            },
        )?;

        let mut written = 0u64;
        let result = http::stream(
            &Request {
                url: &url,
                bearer: bearer.as_deref(),
                form: None,
                timeout: self.app.request_timeout(),
            },
            |data| {
                written += data.len() as u64;
                part.write_chunk(data).map_err(|source| BackendError::Io {
                    action: "write",
                    path: part_path.clone(),
                    source,
                })
            },
        );

        let status = match result {
            Ok(status) if (200..300).contains(&status) => status,
            other => {
                if let Err(e) = part.discard() {
                    tracing::warn!(path = %part_path.display(), "failed to remove temp file: {}", e);
                }
                return Err(match other {
                    Ok(404) => BackendError::ObjectNotFound {
                        bucket: self.name.clone(),
                        object: object.to_string(),
                    },
                    Ok(status) => BackendError::Status { status, url },
                    Err(e) => e,
                });
            }
        };

        part.finalize(dest).map_err(|source| BackendError::Io {
            action: "finalize",
            path: dest.to_path_buf(),
            source,
        })?;
        tracing::info!(
            bucket = %self.name,
            object,
            status,
            bytes = written,
            "downloaded object to {}",
            dest.display()
        );
        Ok(written)
    }
}
