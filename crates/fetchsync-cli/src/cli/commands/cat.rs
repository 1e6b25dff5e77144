//! `fetchsync cat` – sync, then stream the local copy to stdout.

use anyhow::{Context, Result};
use fetchsync_core::config::FetchConfig;
use fetchsync_core::Cache;
use std::io;

use crate::cli::SyncArgs;

pub fn run_cat(cfg: &FetchConfig, args: &SyncArgs) -> Result<()> {
    let path = args.destination(cfg)?;
    let copied = Cache::from_config(cfg).with_synced(
        &args.url,
        &path,
        args.check_modified(cfg),
        |file| -> Result<u64> {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            io::copy(file, &mut out).with_context(|| format!("read {}", path.display()))
        },
    )?;
    tracing::debug!("copied {} bytes from {}", copied, path.display());
    Ok(())
}
