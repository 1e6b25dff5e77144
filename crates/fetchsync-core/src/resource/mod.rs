//! Resource references: a parsed URL plus the transport family serving it.

mod filename;

pub use filename::{filename_for_url, DEFAULT_FILENAME};

use std::fmt;
use url::Url;

use crate::error::FetchError;

/// Transport family, resolved once from the URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// `http` and `https`.
    Http,
    /// `ftp` and `ftps`.
    Ftp,
}

impl Scheme {
    /// Maps a URL scheme to its family, or `None` if no transport handles it.
    pub fn from_url_scheme(scheme: &str) -> Option<Self> {
        match scheme.to_ascii_lowercase().as_str() {
            "http" | "https" => Some(Scheme::Http),
            "ftp" | "ftps" => Some(Scheme::Ftp),
            _ => None,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => f.write_str("http"),
            Scheme::Ftp => f.write_str("ftp"),
        }
    }
}

/// An immutable, validated reference to a remote resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    url: Url,
    scheme: Scheme,
}

impl ResourceRef {
    /// Parses `url` and rejects schemes no transport implements.
    pub fn parse(url: &str) -> Result<Self, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let scheme = Scheme::from_url_scheme(parsed.scheme()).ok_or_else(|| {
            FetchError::UnsupportedScheme {
                scheme: parsed.scheme().to_string(),
            }
        })?;
        Ok(ResourceRef {
            url: parsed,
            scheme,
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Host part of the address (empty for host-less URLs).
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    /// Path on the remote server, percent-encoded as in the URL.
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
