//! `pullkit bucket` and `pullkit doc` – backend checks.

use anyhow::{Context, Result};
use pullkit_core::backend::BackendApp;
use pullkit_core::config::{BackendConfig, PullkitConfig};
use std::path::PathBuf;

fn backend_config(cfg: &PullkitConfig, credentials: Option<PathBuf>) -> BackendConfig {
    let mut backend = cfg.backend.clone();
    if let Some(path) = credentials {
        backend.credential_path = path;
    }
    backend
}

fn initialize(backend: &BackendConfig) -> Result<BackendApp> {
    BackendApp::initialize(&backend.app_name, backend).with_context(|| {
        format!(
            "initialize backend from {}",
            backend.credential_path.display()
        )
    })
}

/// Fetch and print bucket metadata.
pub async fn run_bucket(
    cfg: &PullkitConfig,
    credentials: Option<PathBuf>,
    name: Option<String>,
) -> Result<()> {
    let backend = backend_config(cfg, credentials);
    let meta = tokio::task::spawn_blocking(move || -> Result<_> {
        let app = initialize(&backend)?;
        let bucket = match name {
            Some(name) => app.bucket(name),
            None => app.object_storage(),
        };
        Ok(bucket.metadata()?)
    })
    .await??;

    println!("bucket:   {}", meta.name);
    if let Some(location) = &meta.location {
        println!("location: {}", location);
    }
    if let Some(class) = &meta.storage_class {
        println!("class:    {}", class);
    }
    if let Some(created) = &meta.time_created {
        println!("created:  {}", created);
    }
    Ok(())
}

/// Fetch a document and print it as pretty JSON.
pub async fn run_doc(cfg: &PullkitConfig, path: &str, credentials: Option<PathBuf>) -> Result<()> {
    let backend = backend_config(cfg, credentials);
    let doc_path = path.to_string();
    let doc = tokio::task::spawn_blocking(move || -> Result<_> {
        let app = initialize(&backend)?;
        Ok(app.document_store().get_document(&doc_path)?)
    })
    .await??;

    match doc {
        Some(doc) => {
            println!("{}", serde_json::to_string_pretty(&doc)?);
            Ok(())
        }
        None => anyhow::bail!("document {} not found", path),
    }
}
