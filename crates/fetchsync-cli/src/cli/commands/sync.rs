//! `fetchsync sync` – download unless the local copy is current.

use anyhow::{Context, Result};
use fetchsync_core::config::FetchConfig;
use fetchsync_core::Cache;

use crate::cli::SyncArgs;

pub fn run_sync(cfg: &FetchConfig, args: &SyncArgs) -> Result<()> {
    let path = args.destination(cfg)?;
    let outcome = Cache::from_config(cfg)
        .sync(&args.url, &path, args.check_modified(cfg))
        .with_context(|| format!("sync {}", args.url))?;

    match outcome.bytes_transferred {
        Some(bytes) => println!(
            "fetched {} bytes to {} ({:?})",
            bytes,
            path.display(),
            outcome.decision
        ),
        None => println!("up to date: {} ({:?})", path.display(), outcome.decision),
    }
    Ok(())
}
