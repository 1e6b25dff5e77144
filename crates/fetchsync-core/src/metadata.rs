//! Remote and local file metadata compared by the staleness decision.

use chrono::{DateTime, TimeZone, Utc};
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Size and modification time reported by the remote side without fetching the body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoteMetadata {
    /// `Content-Length` (HTTP) or `SIZE` reply (FTP).
    pub size: Option<u64>,
    /// `Last-Modified` (HTTP) or `MDTM` reply (FTP), whole seconds.
    pub last_modified: Option<DateTime<Utc>>,
}

/// What the local filesystem says about the cached copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalFileState {
    pub exists: bool,
    /// 0 when the file does not exist.
    pub size: u64,
    /// Always `None` when `exists` is false.
    pub last_modified: Option<DateTime<Utc>>,
}

impl LocalFileState {
    pub fn missing() -> Self {
        Self::default()
    }
}

/// Inspects `path`. Never fails: a missing or unreadable entry is `exists = false`.
pub fn inspect(path: &Path) -> LocalFileState {
    let meta = match fs::metadata(path) {
        Ok(m) if m.is_file() => m,
        Ok(_) => {
            tracing::debug!(path = %path.display(), "destination exists but is not a regular file");
            return LocalFileState::missing();
        }
        Err(_) => return LocalFileState::missing(),
    };
    LocalFileState {
        exists: true,
        size: meta.len(),
        last_modified: meta.modified().ok().and_then(to_whole_seconds),
    }
}

/// Converts a filesystem time to UTC, dropping sub-second precision.
pub(crate) fn to_whole_seconds(t: SystemTime) -> Option<DateTime<Utc>> {
    let secs = match t.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_secs()).ok()?,
        Err(e) => {
            // Pre-epoch: round toward negative infinity.
            let d = e.duration();
            let whole = i64::try_from(d.as_secs()).ok()?;
            if d.subsec_nanos() > 0 {
                -whole - 1
            } else {
                -whole
            }
        }
    };
    Utc.timestamp_opt(secs, 0).single()
}
