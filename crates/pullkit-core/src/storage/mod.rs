//! Local file lifecycle for downloads.
//!
//! The destination directory is created on demand, a stale destination file
//! is removed up front, and the body is written to a `.part` file that is
//! renamed onto the destination only when the download succeeds.

mod writer;

pub use writer::PartFile;

use std::io;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before the final rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `file.pdf` → `file.pdf.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Ensures `dir` exists (creating parents as needed).
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dir)
}

/// Removes `path` if it exists. Last write wins; there is no backup.
/// Returns whether a file was removed.
pub fn remove_stale(path: &Path) -> io::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed existing file");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
