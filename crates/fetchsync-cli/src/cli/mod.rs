//! CLI for the fetchsync conditional fetch cache.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use fetchsync_core::config::{self, FetchConfig};
use fetchsync_core::data_dir;
use std::path::PathBuf;

use commands::{run_cat, run_data_dir, run_probe, run_sync};

/// Top-level CLI for fetchsync.
#[derive(Debug, Parser)]
#[command(name = "fetchsync")]
#[command(
    about = "fetchsync: mirror an HTTP/FTP file locally, re-downloading only when it changed",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Where to put the local copy and how strictly to check it.
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// HTTP(S) or FTP(S) URL of the remote file.
    pub url: String,

    /// Local path (default: the data directory plus the URL's filename).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Trust a same-size local copy without comparing modification times.
    #[arg(long)]
    pub no_check_modified: bool,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a file unless the local copy is already current.
    Sync(SyncArgs),

    /// Sync, then write the local copy to stdout.
    Cat(SyncArgs),

    /// Show remote size and modification time without downloading.
    Probe {
        /// HTTP(S) or FTP(S) URL of the remote file.
        url: String,
    },

    /// Print the data directory (created if missing).
    DataDir {
        /// Optional subdirectory inside the data directory.
        sub_dir: Option<String>,
    },
}

impl SyncArgs {
    /// Explicit `--output`, else `<data dir>/<filename from URL>`.
    pub fn destination(&self, cfg: &FetchConfig) -> Result<PathBuf> {
        if let Some(p) = &self.output {
            return Ok(p.clone());
        }
        let dir = resolve_data_dir(cfg, None)?;
        Ok(data_dir::default_destination(&self.url, &dir))
    }

    pub fn check_modified(&self, cfg: &FetchConfig) -> bool {
        cfg.check_modified && !self.no_check_modified
    }
}

fn resolve_data_dir(cfg: &FetchConfig, sub_dir: Option<&str>) -> Result<PathBuf> {
    match &cfg.data_dir {
        Some(root) => data_dir::data_dir_under(root, sub_dir),
        None => data_dir::data_dir(sub_dir),
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Sync(args) => run_sync(&cfg, &args)?,
            CliCommand::Cat(args) => run_cat(&cfg, &args)?,
            CliCommand::Probe { url } => run_probe(&cfg, &url)?,
            CliCommand::DataDir { sub_dir } => {
                let dir = resolve_data_dir(&cfg, sub_dir.as_deref())?;
                run_data_dir(&dir)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
