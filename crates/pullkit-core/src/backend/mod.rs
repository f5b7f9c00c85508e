//! Cloud backend client: a document database and object storage reached
//! with one service-account credential.
//!
//! [`BackendApp::initialize`] loads the credential once and returns an owned
//! connection object. [`BackendApp::document_store`] and
//! [`BackendApp::object_storage`] hand out lightweight handles bound to it.
//! [`AppRegistry`] keeps named apps for callers that want lookup by name.

mod app;
mod auth;
mod bucket;
mod credentials;
mod error;
mod firestore;
mod http;
mod registry;

pub use app::BackendApp;
pub use auth::{AccessToken, Authenticator, ServiceAccountAuth, TOKEN_SCOPES};
pub use bucket::{BucketMetadata, StorageBucket};
pub use credentials::ServiceAccountKey;
pub use error::BackendError;
pub use firestore::DocumentStore;
pub use registry::AppRegistry;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// Name used when none is given.
pub const DEFAULT_APP_NAME: &str = "[DEFAULT]";

/// Characters left unescaped in a single URL path segment.
pub(crate) const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');
