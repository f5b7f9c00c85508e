#![allow(dead_code)]

pub mod http_server;

use std::path::PathBuf;

/// Service-account key fixture shared by the backend tests.
pub fn fixture_key_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("service-account.json")
}
