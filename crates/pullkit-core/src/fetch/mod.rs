//! Single-URL HTTP fetcher.
//!
//! Derives a file name from the URL, prepares the download directory, and
//! streams one GET response to `<dir>/<file name>`. Only a 200 response
//! produces a file.

mod error;

pub use error::FetchError;

use crate::config::PullkitConfig;
use crate::storage::{self, PartFile};
use crate::url_model::UrlTarget;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Reference receive chunk size.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// A successfully downloaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    pub path: PathBuf,
    pub extension: String,
}

/// Options for a [`Fetcher`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Directory downloads are saved into. Created if missing.
    pub download_dir: PathBuf,
    /// libcurl receive buffer and file write buffer size.
    pub chunk_size: usize,
    /// Connect timeout; `None` uses the libcurl default.
    pub connect_timeout: Option<Duration>,
    /// Whole-transfer timeout; `None` means no limit.
    pub timeout: Option<Duration>,
}

impl FetchOptions {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        FetchOptions {
            download_dir: download_dir.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            connect_timeout: None,
            timeout: None,
        }
    }

    /// Options from the loaded configuration. A missing `download_dir` falls
    /// back to the current working directory.
    pub fn from_config(cfg: &PullkitConfig) -> io::Result<Self> {
        let download_dir = match &cfg.download_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        Ok(FetchOptions {
            download_dir,
            chunk_size: cfg.chunk_size.max(1),
            connect_timeout: cfg.connect_timeout_secs.map(Duration::from_secs),
            timeout: cfg.timeout_secs.map(Duration::from_secs),
        })
    }
}

/// Downloads URLs into a fixed directory.
#[derive(Debug, Clone)]
pub struct Fetcher {
    options: FetchOptions,
}

impl Fetcher {
    pub fn new(options: FetchOptions) -> Self {
        Fetcher { options }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Downloads `url` into the download directory.
    ///
    /// Returns `Ok(Some(..))` with the saved path and extension on HTTP 200,
    /// and `Ok(None)` for any other status (nothing is left at the
    /// destination). An existing file with the same name is removed before
    /// the request is issued, whatever the outcome.
    pub fn fetch(&self, url: &str) -> Result<Option<FetchedFile>, FetchError> {
        let target = UrlTarget::from_url(url)?;
        let dir = &self.options.download_dir;

        storage::ensure_dir(dir).map_err(FetchError::io("create directory", dir))?;
        let dest = dir.join(&target.file_name);
        storage::remove_stale(&dest).map_err(FetchError::io("remove", &dest))?;

        let part_path = storage::temp_path(&dest);
        let mut part = PartFile::create(&part_path, self.options.chunk_size)
            .map_err(FetchError::io("create", &part_path))?;

        let status = match self.transfer(url, &mut part) {
            Ok(status) => status,
            Err(e) => {
                if let Err(cleanup) = part.discard() {
                    tracing::warn!(path = %part_path.display(), "failed to remove temp file: {}", cleanup);
                }
                return Err(e);
            }
        };

        if status != 200 {
            part.discard().map_err(FetchError::io("remove", &part_path))?;
            tracing::warn!(
                file_name = %target.file_name,
                status,
                "failed to download {}: HTTP status {}",
                target.file_name,
                status
            );
            return Ok(None);
        }

        part.finalize(&dest).map_err(FetchError::io("finalize", &dest))?;
        tracing::info!(path = %dest.display(), extension = %target.extension, "downloaded {}", url);
        Ok(Some(FetchedFile {
            path: dest,
            extension: target.extension,
        }))
    }

    /// Runs the GET, streaming the body into `part`. Returns the final status.
    fn transfer(&self, url: &str, part: &mut PartFile) -> Result<u32, FetchError> {
        let curl_err = |source: curl::Error| FetchError::Transfer {
            url: url.to_string(),
            source,
        };

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(curl_err)?;
        easy.get(true).map_err(curl_err)?;
        easy.follow_location(true).map_err(curl_err)?;
        easy.max_redirections(10).map_err(curl_err)?;
        easy.buffer_size(self.options.chunk_size).map_err(curl_err)?;
        if let Some(t) = self.options.connect_timeout {
            easy.connect_timeout(t).map_err(curl_err)?;
        }
        if let Some(t) = self.options.timeout {
            easy.timeout(t).map_err(curl_err)?;
        }

        let mut write_err: Option<io::Error> = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| match part.write_chunk(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        write_err = Some(e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(curl_err)?;
            transfer.perform()
        };

        if let Some(source) = write_err {
            return Err(FetchError::Io {
                action: "write",
                path: part.temp_path().to_path_buf(),
                source,
            });
        }
        performed.map_err(curl_err)?;

        let code = easy.response_code().map_err(curl_err)?;
        tracing::debug!(url, status = code, "GET complete");
        Ok(code)
    }
}

/// Convenience wrapper: fetch `url` into `download_dir` with default options.
pub fn fetch_to(download_dir: &Path, url: &str) -> Result<Option<FetchedFile>, FetchError> {
    Fetcher::new(FetchOptions::new(download_dir)).fetch(url)
}
