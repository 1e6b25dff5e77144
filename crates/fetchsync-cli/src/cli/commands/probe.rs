//! `fetchsync probe` – show remote metadata without downloading.

use anyhow::Result;
use fetchsync_core::config::FetchConfig;
use fetchsync_core::resource::ResourceRef;
use fetchsync_core::transport::{self, Transport};

pub fn run_probe(cfg: &FetchConfig, url: &str) -> Result<()> {
    let resource = ResourceRef::parse(url)?;
    let meta = transport::for_scheme(resource.scheme(), &cfg.transport_options()).probe(&resource)?;

    let size = meta
        .size
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    let modified = meta
        .last_modified
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());
    println!("{:<10} {}", "SCHEME", resource.scheme());
    println!("{:<10} {}", "SIZE", size);
    println!("{:<10} {}", "MODIFIED", modified);
    Ok(())
}
