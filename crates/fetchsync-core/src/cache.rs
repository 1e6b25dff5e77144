//! Conditional fetch: mirror a remote file locally, re-downloading only when stale.
//!
//! Every call is independent. The remote side is probed, the local file is
//! inspected, [`staleness::decide`](crate::staleness::decide) picks a rule and
//! the transport fetches only when that rule says so. Concurrent calls on the
//! same destination path are not coordinated: one caller may read a file
//! another caller is still writing.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::metadata;
use crate::resource::ResourceRef;
use crate::staleness::{self, Decision};
use crate::transport::{self, Transport, TransportOptions};

/// What a sync did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Rule that decided.
    pub decision: Decision,
    /// Bytes written when a transfer happened.
    pub bytes_transferred: Option<u64>,
}

impl SyncOutcome {
    pub fn fetched(&self) -> bool {
        self.bytes_transferred.is_some()
    }
}

/// Conditional fetch cache with explicit transport options.
#[derive(Debug, Clone, Default)]
pub struct Cache {
    options: TransportOptions,
}

impl Cache {
    pub fn new(options: TransportOptions) -> Self {
        Self { options }
    }

    pub fn from_config(cfg: &FetchConfig) -> Self {
        Self::new(cfg.transport_options())
    }

    /// Makes `path` mirror `url`, fetching only when the local copy is missing or stale.
    pub fn sync(&self, url: &str, path: &Path, check_modified: bool) -> Result<SyncOutcome, FetchError> {
        let resource = ResourceRef::parse(url)?;
        let transport = transport::for_scheme(resource.scheme(), &self.options);
        sync_with(transport.as_ref(), &resource, path, check_modified)
    }

    /// Syncs, then opens `path` for reading. The handle closes when dropped.
    pub fn open_synced(&self, url: &str, path: &Path, check_modified: bool) -> Result<SyncedFile, FetchError> {
        self.sync(url, path, check_modified)?;
        SyncedFile::open(path)
    }

    /// Syncs, then runs `f` over the opened file. The file is closed before
    /// this returns, whether `f` succeeds, fails or panics.
    pub fn with_synced<T, E, F>(&self, url: &str, path: &Path, check_modified: bool, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut SyncedFile) -> Result<T, E>,
        E: From<FetchError>,
    {
        let file = self.open_synced(url, path, check_modified)?;
        consume_scoped(file, f)
    }
}

/// [`Cache::sync`] with default transport options.
pub fn sync(url: &str, path: &Path, check_modified: bool) -> Result<SyncOutcome, FetchError> {
    Cache::default().sync(url, path, check_modified)
}

/// [`Cache::open_synced`] with default transport options.
pub fn open_synced(url: &str, path: &Path, check_modified: bool) -> Result<SyncedFile, FetchError> {
    Cache::default().open_synced(url, path, check_modified)
}

/// [`Cache::with_synced`] with default transport options.
pub fn with_synced<T, E, F>(url: &str, path: &Path, check_modified: bool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut SyncedFile) -> Result<T, E>,
    E: From<FetchError>,
{
    Cache::default().with_synced(url, path, check_modified, f)
}

/// Runs `f` over `file` and closes the file before handing back the result.
/// A panic in `f` unwinds through here and drops the file on the way out.
fn consume_scoped<T, E, F>(mut file: SyncedFile, f: F) -> Result<T, E>
where
    F: FnOnce(&mut SyncedFile) -> Result<T, E>,
{
    let result = f(&mut file);
    drop(file);
    result
}

/// Probe, inspect, decide, fetch.
pub(crate) fn sync_with(
    transport: &dyn Transport,
    resource: &ResourceRef,
    path: &Path,
    check_modified: bool,
) -> Result<SyncOutcome, FetchError> {
    let remote = transport.probe(resource)?;
    let local = metadata::inspect(path);
    let decision = staleness::decide_for(resource.as_str(), &remote, &local, check_modified);
    tracing::debug!(url = %resource, path = %path.display(), ?decision, "staleness decision");

    if !decision.should_fetch() {
        return Ok(SyncOutcome {
            decision,
            bytes_transferred: None,
        });
    }

    let bytes = transport.fetch(resource, path)?;
    tracing::info!(url = %resource, path = %path.display(), bytes, "fetched");
    Ok(SyncOutcome {
        decision,
        bytes_transferred: Some(bytes),
    })
}

/// Read-only handle over a synced file. Closed when dropped.
#[derive(Debug)]
pub struct SyncedFile {
    reader: BufReader<File>,
    path: PathBuf,
}

impl SyncedFile {
    fn open(path: &Path) -> Result<Self, FetchError> {
        let file = File::open(path).map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(SyncedFile {
            reader: BufReader::new(file),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the file on disk.
    pub fn len(&self) -> io::Result<u64> {
        Ok(self.reader.get_ref().metadata()?.len())
    }

    pub fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Read for SyncedFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for SyncedFile {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

impl Seek for SyncedFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.reader.seek(pos)
    }
}

impl Drop for SyncedFile {
    fn drop(&mut self) {
        tracing::trace!(path = %self.path.display(), "closing synced file");
    }
}
