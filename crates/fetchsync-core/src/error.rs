//! Error types surfaced by the cache.
//!
//! `TransportError` covers everything that can go wrong while talking to the
//! remote side (or writing what it sends); `FetchError` adds the failures that
//! happen before any network activity and when reopening the synced file.

use std::io;
use std::path::PathBuf;

/// Failure while probing or fetching a remote resource.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Curl reported an error (DNS, connect, timeout, FTP command rejected, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),

    /// HTTP response had a non-2xx status.
    #[error("{method} {url} returned HTTP {code}")]
    Http {
        method: &'static str,
        url: String,
        code: u32,
    },

    /// FTP server did not report a value that is always expected (SIZE or MDTM).
    #[error("FTP server gave no {field} for {url}")]
    MissingFtpReply { field: &'static str, url: String },

    /// A reply was present but could not be parsed.
    #[error("malformed {what} reply: {reply:?}")]
    Malformed { what: &'static str, reply: String },

    /// Writing the received body to disk failed (disk full, permission denied, ...).
    #[error("storage {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors returned by [`crate::cache`] operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Scheme is neither HTTP(S) nor FTP(S). Nothing was fetched.
    #[error("unsupported URL scheme {scheme:?} (only http, https, ftp and ftps are implemented)")]
    UnsupportedScheme { scheme: String },

    /// URL could not be parsed at all.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The synced file could not be opened for reading.
    #[error("failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    /// True if the failure happened on the network/transfer side.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }
}
