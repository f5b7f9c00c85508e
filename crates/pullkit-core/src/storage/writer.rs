//! Sequential writer for `.part` download files.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A temp download file written front to back. Either `finalize` it onto the
/// destination or `discard` it; dropping without either leaves the `.part`
/// file behind.
pub struct PartFile {
    file: BufWriter<File>,
    temp_path: PathBuf,
}

impl PartFile {
    /// Create the temp file at `temp_path` with a write buffer of `buffer_size` bytes.
    /// Truncates if the path already exists.
    pub fn create(temp_path: &Path, buffer_size: usize) -> io::Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)?;
        Ok(PartFile {
            file: BufWriter::with_capacity(buffer_size, file),
            temp_path: temp_path.to_path_buf(),
        })
    }

    /// Append one chunk.
    pub fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)
    }

    /// Path to the temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush, close, and rename onto `final_path`. Replaces an existing file.
    pub fn finalize(self, final_path: &Path) -> io::Result<()> {
        let PartFile { file, temp_path } = self;
        let file = file.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&temp_path, final_path)
    }

    /// Close and delete the temp file.
    pub fn discard(self) -> io::Result<()> {
        let PartFile { file, temp_path } = self;
        drop(file);
        match std::fs::remove_file(&temp_path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
