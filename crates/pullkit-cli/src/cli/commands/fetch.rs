//! `pullkit fetch <url>` – download one URL.

use anyhow::Result;
use pullkit_core::config::PullkitConfig;
use pullkit_core::fetch::{FetchOptions, Fetcher};
use std::path::PathBuf;

pub async fn run_fetch(cfg: &PullkitConfig, url: &str, dir: Option<PathBuf>) -> Result<()> {
    let mut opts = FetchOptions::from_config(cfg)?;
    if let Some(dir) = dir {
        opts.download_dir = dir;
    }
    let fetcher = Fetcher::new(opts);
    tracing::debug!(dir = %fetcher.options().download_dir.display(), "fetching {}", url);
    let owned_url = url.to_string();
    let result = tokio::task::spawn_blocking(move || fetcher.fetch(&owned_url)).await??;

    match result {
        Some(fetched) => {
            if fetched.extension.is_empty() {
                println!("Saved {}", fetched.path.display());
            } else {
                println!(
                    "Saved {} (extension: {})",
                    fetched.path.display(),
                    fetched.extension
                );
            }
            Ok(())
        }
        None => anyhow::bail!("download of {} failed (non-200 response; see log)", url),
    }
}
