//! Protocol-specific probe and fetch.
//!
//! Both transports run on libcurl (via the `curl` crate) in the calling
//! thread. A fresh `Easy` handle is built for every probe and every fetch, so
//! no connection outlives the call that opened it.

mod ftp;
mod http;
pub(crate) mod parse;

pub use ftp::FtpTransport;
pub use http::HttpTransport;

use std::cell::RefCell;
use std::io;
use std::path::Path;
use std::time::Duration;

use crate::error::TransportError;
use crate::metadata::RemoteMetadata;
use crate::resource::{ResourceRef, Scheme};
use crate::storage::{DestinationWriter, CHUNK_SIZE};

/// Network knobs applied to every curl handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Time allowed for the TCP/TLS (and FTP login) handshake.
    pub connect_timeout: Duration,
    /// Overall limit for one probe or fetch (None = no limit).
    pub timeout: Option<Duration>,
    /// Abort when slower than this many bytes/s for `low_speed_time` (0 disables).
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    /// Maximum HTTP redirects followed.
    pub max_redirections: u32,
    /// `User-Agent` sent with HTTP requests (None = libcurl default, which sends none).
    pub user_agent: Option<String>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: None,
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
            max_redirections: 10,
            user_agent: None,
        }
    }
}

/// Probe and fetch for one protocol family.
pub trait Transport {
    /// Remote size and modification time, without transferring the body.
    fn probe(&self, resource: &ResourceRef) -> Result<RemoteMetadata, TransportError>;

    /// Writes the full remote body to `destination`, overwriting it. Returns bytes written.
    fn fetch(&self, resource: &ResourceRef, destination: &Path) -> Result<u64, TransportError>;
}

/// Returns the transport serving `scheme`.
pub fn for_scheme(scheme: Scheme, options: &TransportOptions) -> Box<dyn Transport> {
    match scheme {
        Scheme::Http => Box::new(HttpTransport::new(options.clone())),
        Scheme::Ftp => Box::new(FtpTransport::new(options.clone())),
    }
}

/// Builds an `Easy` handle for `url` with the shared options applied.
fn new_easy(url: &str, options: &TransportOptions) -> Result<curl::easy::Easy, TransportError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.connect_timeout(options.connect_timeout)?;
    if let Some(t) = options.timeout {
        easy.timeout(t)?;
    }
    if options.low_speed_limit > 0 {
        easy.low_speed_limit(options.low_speed_limit)?;
        easy.low_speed_time(options.low_speed_time)?;
    }
    if let Some(ua) = &options.user_agent {
        easy.useragent(ua)?;
    }
    easy.buffer_size(CHUNK_SIZE)?;
    Ok(easy)
}

/// Runs the transfer configured on `easy`, streaming the body into `destination`.
///
/// Header/reply lines are discarded. A write failure aborts the transfer and
/// is reported as `TransportError::Storage` rather than the curl write error.
fn stream_to_file(easy: &mut curl::easy::Easy, destination: &Path) -> Result<u64, TransportError> {
    let writer = RefCell::new(DestinationWriter::create(destination)?);
    let write_failure: RefCell<Option<io::Error>> = RefCell::new(None);

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            match writer.borrow_mut().write_chunk(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    tracing::warn!("write to {} failed: {}", destination.display(), e);
                    *write_failure.borrow_mut() = Some(e);
                    Ok(0) // abort transfer
                }
            }
        })?;
        transfer.perform()
    };

    let writer = writer.into_inner();
    if let Some(e) = write_failure.into_inner() {
        return Err(writer.storage_error(e));
    }
    performed?;
    writer.finish()
}
