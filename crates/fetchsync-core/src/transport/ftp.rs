//! FTP(S): SIZE/MDTM probe and binary RETR.
//!
//! libcurl logs in anonymously when the URL carries no credentials and runs
//! the session in binary mode (`TYPE I`) before `SIZE` and `RETR`.
//! `fetch_filetime(true)` makes it issue `MDTM`.

use std::path::Path;
use std::str;

use chrono::{DateTime, TimeZone, Utc};

use super::{new_easy, parse, stream_to_file, Transport, TransportOptions};
use crate::error::TransportError;
use crate::metadata::RemoteMetadata;
use crate::resource::ResourceRef;

/// FTP transport (anonymous login, binary mode).
#[derive(Debug, Clone, Default)]
pub struct FtpTransport {
    options: TransportOptions,
}

impl FtpTransport {
    pub fn new(options: TransportOptions) -> Self {
        Self { options }
    }

    fn easy(&self, url: &str) -> Result<curl::easy::Easy, TransportError> {
        new_easy(url, &self.options)
    }
}

impl Transport for FtpTransport {
    fn probe(&self, resource: &ResourceRef) -> Result<RemoteMetadata, TransportError> {
        let url = resource.as_str();
        let mut replies: Vec<String> = Vec::new();

        let mut easy = self.easy(url)?;
        easy.nobody(true)?; // SIZE/MDTM only, no RETR
        easy.fetch_filetime(true)?;
        {
            let mut transfer = easy.transfer();
            // For FTP libcurl passes the server's control-connection replies here.
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    replies.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.perform()?;
        }

        let parsed = parse::parse_ftp_replies(&replies);

        let size = content_length(easy.content_length_download()?)
            .or(parsed.size)
            .ok_or_else(|| TransportError::MissingFtpReply {
                field: "SIZE",
                url: url.to_string(),
            })?;

        let last_modified = match parsed.mdtm.as_deref() {
            Some(reply) => parse::parse_mdtm(reply)?,
            None => easy
                .filetime()?
                .and_then(from_unix_seconds)
                .ok_or_else(|| TransportError::MissingFtpReply {
                    field: "MDTM",
                    url: url.to_string(),
                })?,
        };

        tracing::debug!(url, size, %last_modified, "FTP probe");
        Ok(RemoteMetadata {
            size: Some(size),
            last_modified: Some(last_modified),
        })
    }

    fn fetch(&self, resource: &ResourceRef, destination: &Path) -> Result<u64, TransportError> {
        let url = resource.as_str();
        let mut easy = self.easy(url)?;
        let written = stream_to_file(&mut easy, destination)?;
        tracing::debug!(url, bytes = written, "RETR complete");
        Ok(written)
    }
}

/// libcurl reports the SIZE reply as a double, `-1` when unknown.
fn content_length(reported: f64) -> Option<u64> {
    let rounded = reported.round();
    // 2^64 is the first double past `u64::MAX`.
    if rounded.is_nan() || rounded < 0.0 || rounded >= 18_446_744_073_709_551_616.0 {
        return None;
    }
    Some(rounded as u64)
}

fn from_unix_seconds(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}
