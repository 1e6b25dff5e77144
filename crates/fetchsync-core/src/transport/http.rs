//! HTTP(S): HEAD probe and streaming GET.

use std::path::Path;
use std::str;

use super::{new_easy, parse, stream_to_file, Transport, TransportOptions};
use crate::error::TransportError;
use crate::metadata::RemoteMetadata;
use crate::resource::ResourceRef;

/// HTTP/HTTPS transport. Follows redirects up to `max_redirections`.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    options: TransportOptions,
}

impl HttpTransport {
    pub fn new(options: TransportOptions) -> Self {
        Self { options }
    }

    fn easy(&self, url: &str) -> Result<curl::easy::Easy, TransportError> {
        let mut easy = new_easy(url, &self.options)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.options.max_redirections)?;
        Ok(easy)
    }
}

impl Transport for HttpTransport {
    fn probe(&self, resource: &ResourceRef) -> Result<RemoteMetadata, TransportError> {
        let url = resource.as_str();
        let mut headers: Vec<String> = Vec::new();

        let mut easy = self.easy(url)?;
        easy.nobody(true)?; // HEAD request
        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(TransportError::Http {
                method: "HEAD",
                url: url.to_string(),
                code,
            });
        }

        let meta = parse::parse_http_headers(&headers);
        tracing::debug!(
            url,
            size = ?meta.size,
            last_modified = ?meta.last_modified,
            "HEAD probe"
        );
        Ok(meta)
    }

    fn fetch(&self, resource: &ResourceRef, destination: &Path) -> Result<u64, TransportError> {
        let url = resource.as_str();
        let mut easy = self.easy(url)?;
        // Error statuses abort before any body byte reaches the destination.
        easy.fail_on_error(true)?;

        let written = match stream_to_file(&mut easy, destination) {
            Err(TransportError::Curl(e)) if e.is_http_returned_error() => {
                let code = easy.response_code().unwrap_or(0);
                return Err(TransportError::Http {
                    method: "GET",
                    url: url.to_string(),
                    code,
                });
            }
            other => other?,
        };

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(TransportError::Http {
                method: "GET",
                url: url.to_string(),
                code,
            });
        }
        tracing::debug!(url, bytes = written, "GET complete");
        Ok(written)
    }
}
