//! Fetch/no-fetch decision from remote and local metadata.
//!
//! The rules are applied in order and the first one that matches wins:
//!
//! 1. no local copy: fetch
//! 2. remote size known and different: fetch
//! 3. modification check disabled: keep
//! 4. remote timestamp unknown: fetch (and warn)
//! 5. remote timestamp newer than local: fetch
//! 6. otherwise keep
//!
//! An unknown remote size never triggers rule 2, so the decision falls through
//! to the timestamp rules without the size ever having been confirmed.

use crate::metadata::{LocalFileState, RemoteMetadata};

/// Which rule decided, and whether it means a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No local file.
    Missing,
    /// Remote size differs from the local size.
    SizeMismatch { remote: u64, local: u64 },
    /// Modification check disabled; local copy trusted.
    ModifiedCheckSkipped,
    /// Remote gave no timestamp; re-download to be safe.
    NoRemoteTimestamp,
    /// Remote timestamp is newer than the local mtime.
    RemoteNewer,
    /// Local copy is at least as new as the remote one.
    UpToDate,
}

impl Decision {
    pub fn should_fetch(self) -> bool {
        matches!(
            self,
            Decision::Missing
                | Decision::SizeMismatch { .. }
                | Decision::NoRemoteTimestamp
                | Decision::RemoteNewer
        )
    }
}

/// Pure decision; see the module docs for the rule order.
pub fn decide(remote: &RemoteMetadata, local: &LocalFileState, check_modified: bool) -> Decision {
    if !local.exists {
        return Decision::Missing;
    }
    if let Some(size) = remote.size {
        if size != local.size {
            return Decision::SizeMismatch {
                remote: size,
                local: local.size,
            };
        }
    }
    if !check_modified {
        return Decision::ModifiedCheckSkipped;
    }
    let Some(remote_mtime) = remote.last_modified else {
        return Decision::NoRemoteTimestamp;
    };
    match local.last_modified {
        Some(local_mtime) if remote_mtime <= local_mtime => Decision::UpToDate,
        _ => Decision::RemoteNewer,
    }
}

/// [`decide`] for the resource at `url`, reporting the missing-timestamp case
/// as a warning event.
pub fn decide_for(
    url: &str,
    remote: &RemoteMetadata,
    local: &LocalFileState,
    check_modified: bool,
) -> Decision {
    let decision = decide(remote, local, check_modified);
    if decision == Decision::NoRemoteTimestamp {
        tracing::warn!(url, "no last-modified date for request, downloading file again");
    }
    decision
}

/// Boolean form of [`decide_for`].
pub fn should_fetch(
    url: &str,
    remote: &RemoteMetadata,
    local: &LocalFileState,
    check_modified: bool,
) -> bool {
    decide_for(url, remote, local, check_modified).should_fetch()
}
