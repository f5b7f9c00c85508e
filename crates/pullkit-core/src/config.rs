use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::DEFAULT_APP_NAME;
use crate::fetch::DEFAULT_CHUNK_SIZE;

/// Backend connection settings (the `[backend]` section of config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Name the app is registered under.
    pub app_name: String,
    /// Service-account JSON key. Relative paths resolve against the working directory.
    pub credential_path: PathBuf,
    /// Project id override; defaults to the key's `project_id`.
    pub project_id: Option<String>,
    /// Bucket returned by `object_storage()`; defaults to `<project_id>.firebasestorage.app`.
    pub bucket: Option<String>,
    /// Document database REST endpoint.
    pub firestore_endpoint: String,
    /// Object storage REST endpoint.
    pub storage_endpoint: String,
    /// Skip OAuth entirely (local emulators).
    pub anonymous: bool,
    /// Per-request timeout in seconds for backend calls.
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            credential_path: PathBuf::from("service-account.json"),
            project_id: None,
            bucket: None,
            firestore_endpoint: "https://firestore.googleapis.com".to_string(),
            storage_endpoint: "https://storage.googleapis.com".to_string(),
            anonymous: false,
            request_timeout_secs: 60,
        }
    }
}

/// Global configuration loaded from `~/.config/pullkit/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullkitConfig {
    /// Directory fetched files are saved into. None = current working directory.
    pub download_dir: Option<PathBuf>,
    /// Receive chunk size in bytes.
    pub chunk_size: usize,
    /// Connect timeout in seconds (None = libcurl default).
    pub connect_timeout_secs: Option<u64>,
    /// Whole-transfer timeout in seconds (None = no limit).
    pub timeout_secs: Option<u64>,
    pub backend: BackendConfig,
}

impl Default for PullkitConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            connect_timeout_secs: Some(30),
            timeout_secs: None,
            backend: BackendConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pullkit")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PullkitConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PullkitConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<PullkitConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: PullkitConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = PullkitConfig::default();
        assert!(cfg.download_dir.is_none());
        assert_eq!(cfg.chunk_size, 8192);
        assert_eq!(cfg.connect_timeout_secs, Some(30));
        assert!(cfg.timeout_secs.is_none());
        assert_eq!(cfg.backend.app_name, "[DEFAULT]");
        assert!(!cfg.backend.anonymous);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = PullkitConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: PullkitConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_partial_file() {
        let toml = r#"
            download_dir = "/var/lib/pullkit"

            [backend]
            credential_path = "/etc/pullkit/key.json"
            bucket = "uploads.example.app"
        "#;
        let cfg: PullkitConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.download_dir, Some(PathBuf::from("/var/lib/pullkit")));
        assert_eq!(cfg.chunk_size, 8192);
        assert_eq!(
            cfg.backend.credential_path,
            PathBuf::from("/etc/pullkit/key.json")
        );
        assert_eq!(cfg.backend.bucket.as_deref(), Some("uploads.example.app"));
        assert_eq!(
            cfg.backend.storage_endpoint,
            "https://storage.googleapis.com"
        );
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "chunk_size = 65536\ntimeout_secs = 300\n\n[backend]\nanonymous = true\n",
        )
        .unwrap();
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.chunk_size, 65536);
        assert_eq!(cfg.timeout_secs, Some(300));
        assert!(cfg.backend.anonymous);
    }

    #[test]
    fn load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "chunk_size = \"big\"\n").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parse config"));
    }
}
