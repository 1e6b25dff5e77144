//! Destination file writer used by both transports.
//!
//! Creates the parent directory, truncates any existing file and streams the
//! body through a fixed-size buffer. The file is written in place: a failed
//! transfer leaves a partial file behind, which callers must not trust.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::TransportError;

/// Buffer size for streaming response bodies to disk (64 KiB).
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Sequential writer for a destination path.
pub struct DestinationWriter {
    out: BufWriter<File>,
    path: PathBuf,
    written: u64,
}

impl DestinationWriter {
    /// Creates `path` (and its parent directory if missing). Overwrites an existing file.
    pub fn create(path: &Path) -> Result<Self, TransportError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| TransportError::Storage {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|source| TransportError::Storage {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(DestinationWriter {
            out: BufWriter::with_capacity(CHUNK_SIZE, file),
            path: path.to_path_buf(),
            written: 0,
        })
    }

    /// Appends `data`.
    pub fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.out.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Wraps an I/O error with this writer's path.
    pub(crate) fn storage_error(&self, source: io::Error) -> TransportError {
        TransportError::Storage {
            path: self.path.clone(),
            source,
        }
    }

    /// Flushes buffered bytes and closes the file. Returns the total bytes written.
    pub fn finish(self) -> Result<u64, TransportError> {
        let DestinationWriter { out, path, written } = self;
        let file = out.into_inner().map_err(|e| TransportError::Storage {
            path: path.clone(),
            source: e.into_error(),
        })?;
        file.sync_all()
            .map_err(|source| TransportError::Storage { path, source })?;
        Ok(written)
    }
}
