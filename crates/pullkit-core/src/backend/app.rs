//! The backend connection object.

use super::auth::{Authenticator, ServiceAccountAuth};
use super::bucket::StorageBucket;
use super::credentials::ServiceAccountKey;
use super::firestore::DocumentStore;
use super::BackendError;
use crate::config::BackendConfig;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Suffix appended to the project id to form the default bucket name.
const DEFAULT_BUCKET_SUFFIX: &str = ".firebasestorage.app";

/// One initialized connection to the cloud backend.
///
/// Cloning is cheap; clones share the credential, endpoints and token cache.
/// Handles from [`document_store`](Self::document_store) and
/// [`object_storage`](Self::object_storage) are built on demand and never
/// re-read the credential file.
#[derive(Clone)]
pub struct BackendApp {
    inner: Arc<AppInner>,
}

struct AppInner {
    name: String,
    project_id: String,
    default_bucket: String,
    firestore_endpoint: String,
    storage_endpoint: String,
    request_timeout: Duration,
    auth: Authenticator,
}

impl BackendApp {
    /// Reads the credential at `cfg.credential_path` and builds the app.
    pub fn initialize(name: &str, cfg: &BackendConfig) -> Result<Self, BackendError> {
        let key = ServiceAccountKey::from_path(&cfg.credential_path)?;
        Self::from_key(name, &key, cfg)
    }

    /// Builds the app from an already loaded key.
    pub fn from_key(
        name: &str,
        key: &ServiceAccountKey,
        cfg: &BackendConfig,
    ) -> Result<Self, BackendError> {
        let request_timeout = Duration::from_secs(cfg.request_timeout_secs.max(1));
        let auth = if cfg.anonymous {
            Authenticator::Anonymous
        } else {
            Authenticator::ServiceAccount(ServiceAccountAuth::new(key, request_timeout)?)
        };
        let project_id = cfg
            .project_id
            .clone()
            .unwrap_or_else(|| key.project_id.clone());
        let default_bucket = cfg
            .bucket
            .clone()
            .unwrap_or_else(|| format!("{}{}", project_id, DEFAULT_BUCKET_SUFFIX));

        tracing::info!(
            app = name,
            project_id = %project_id,
            bucket = %default_bucket,
            anonymous = cfg.anonymous,
            "initialized backend app"
        );

        Ok(BackendApp {
            inner: Arc::new(AppInner {
                name: name.to_string(),
                project_id,
                default_bucket,
                firestore_endpoint: cfg.firestore_endpoint.trim_end_matches('/').to_string(),
                storage_endpoint: cfg.storage_endpoint.trim_end_matches('/').to_string(),
                request_timeout,
                auth,
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn project_id(&self) -> &str {
        &self.inner.project_id
    }

    /// Bucket returned by [`object_storage`](Self::object_storage).
    pub fn default_bucket(&self) -> &str {
        &self.inner.default_bucket
    }

    /// Handle to the project's document database.
    pub fn document_store(&self) -> DocumentStore {
        DocumentStore::new(self.clone())
    }

    /// Handle to the configured storage bucket.
    pub fn object_storage(&self) -> StorageBucket {
        StorageBucket::new(self.clone(), self.inner.default_bucket.clone())
    }

    /// Handle to any other bucket reachable with this app's credential.
    pub fn bucket(&self, name: impl Into<String>) -> StorageBucket {
        StorageBucket::new(self.clone(), name.into())
    }

    /// True when `other` is a clone of this app rather than a separate connection.
    pub fn same_connection(&self, other: &BackendApp) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn firestore_endpoint(&self) -> &str {
        &self.inner.firestore_endpoint
    }

    pub(crate) fn storage_endpoint(&self) -> &str {
        &self.inner.storage_endpoint
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        self.inner.request_timeout
    }

    pub(crate) fn bearer(&self) -> Result<Option<String>, BackendError> {
        self.inner.auth.bearer()
    }
}

impl fmt::Debug for BackendApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendApp")
            .field("name", &self.inner.name)
            .field("project_id", &self.inner.project_id)
            .field("default_bucket", &self.inner.default_bucket)
            .field("auth", &self.inner.auth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::credentials::tests::FIXTURE;

    fn key() -> ServiceAccountKey {
        ServiceAccountKey::from_json(FIXTURE).unwrap()
    }

    #[test]
    fn default_bucket_from_project() {
        let app = BackendApp::from_key("[DEFAULT]", &key(), &BackendConfig::default()).unwrap();
        assert_eq!(app.name(), "[DEFAULT]");
        assert_eq!(app.project_id(), "pullkit-test");
        assert_eq!(app.default_bucket(), "pullkit-test.firebasestorage.app");
        assert_eq!(app.object_storage().name(), "pullkit-test.firebasestorage.app");
    }

    #[test]
    fn config_overrides() {
        let cfg = BackendConfig {
            project_id: Some("other-project".to_string()),
            bucket: Some("uploads.example.app".to_string()),
            storage_endpoint: "http://127.0.0.1:9199/".to_string(),
            anonymous: true,
            ..BackendConfig::default()
        };
        let app = BackendApp::from_key("emulator", &key(), &cfg).unwrap();
        assert_eq!(app.project_id(), "other-project");
        assert_eq!(app.object_storage().name(), "uploads.example.app");
        assert_eq!(app.storage_endpoint(), "http://127.0.0.1:9199");
        assert!(app.bearer().unwrap().is_none());
    }

    #[test]
    fn accessors_share_the_connection() {
        let app = BackendApp::from_key("a", &key(), &BackendConfig::default()).unwrap();
        let store1 = app.document_store();
        let store2 = app.document_store();
        assert!(store1.app().same_connection(store2.app()));
        assert!(app.object_storage().app().same_connection(&app));
        assert_eq!(app.bucket("x").name(), "x");

        let separate = BackendApp::from_key("b", &key(), &BackendConfig::default()).unwrap();
        assert!(!separate.same_connection(&app));
    }

    #[test]
    fn debug_omits_secrets() {
        let app = BackendApp::from_key("a", &key(), &BackendConfig::default()).unwrap();
        let dbg = format!("{:?}", app);
        assert!(dbg.contains("fetcher@pullkit-test.iam.gserviceaccount.com"));
        assert!(!dbg.contains("PRIVATE KEY"));
    }
}
