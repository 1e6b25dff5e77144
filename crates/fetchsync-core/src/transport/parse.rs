//! Parse HTTP response headers and FTP replies into remote metadata.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::TransportError;
use crate::metadata::RemoteMetadata;

/// Parse collected HTTP header lines into RemoteMetadata.
///
/// Only the last response block counts: libcurl hands over the headers of
/// every redirect hop, and the final hop describes the resource.
pub(crate) fn parse_http_headers(lines: &[String]) -> RemoteMetadata {
    let mut meta = RemoteMetadata::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            meta = RemoteMetadata::default();
            continue;
        }
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            meta.size = value.parse::<u64>().ok();
        } else if name.eq_ignore_ascii_case("last-modified") {
            meta.last_modified = parse_http_date(value);
            if meta.last_modified.is_none() {
                tracing::debug!(value, "ignoring unparseable Last-Modified");
            }
        }
    }

    meta
}

/// Parses an RFC 1123 date (`Tue, 01 Jan 2019 00:00:00 GMT`).
pub(crate) fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parses an MDTM timestamp (`YYYYMMDDhhmmss`, optionally `.sss`), always UTC.
pub(crate) fn parse_mdtm(value: &str) -> Result<DateTime<Utc>, TransportError> {
    let malformed = || TransportError::Malformed {
        what: "MDTM",
        reply: value.to_string(),
    };
    let whole = value.trim().split('.').next().unwrap_or("");
    if whole.len() != 14 || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    NaiveDateTime::parse_from_str(whole, "%Y%m%d%H%M%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| malformed())
}

/// Values pulled out of raw FTP control-connection replies.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct FtpReplies {
    pub size: Option<u64>,
    pub mdtm: Option<String>,
}

/// Scans FTP reply lines for the `213` answers to `SIZE` and `MDTM`.
///
/// Both commands answer with code 213; a 14-digit payload (optionally with
/// fractional seconds) is a timestamp, any other number is a size.
pub(crate) fn parse_ftp_replies(lines: &[String]) -> FtpReplies {
    let mut replies = FtpReplies::default();
    for line in lines {
        let Some(payload) = line.trim().strip_prefix("213 ") else {
            continue;
        };
        let payload = payload.trim();
        let whole = payload.split('.').next().unwrap_or("");
        if whole.len() == 14 && whole.bytes().all(|b| b.is_ascii_digit()) {
            replies.mdtm = Some(payload.to_string());
        } else if let Ok(n) = payload.parse::<u64>() {
            replies.size = Some(n);
        }
    }
    replies
}
