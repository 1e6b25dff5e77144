//! Application data directory and default destinations inside it.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::resource::filename_for_url;

/// Resolves `~/.local/share/fetchsync[/sub_dir]`, creating it if needed.
pub fn data_dir(sub_dir: Option<&str>) -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fetchsync")?;
    let dir = match sub_dir {
        Some(sub) => xdg_dirs.get_data_home().join(sub),
        None => xdg_dirs.get_data_home(),
    };
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Like [`data_dir`] but rooted at `root` instead of the XDG data home.
pub fn data_dir_under(root: &Path, sub_dir: Option<&str>) -> Result<PathBuf> {
    let dir = match sub_dir {
        Some(sub) => root.join(sub),
        None => root.to_path_buf(),
    };
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Creates `dir` (and parents) if it does not exist.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory: {}", dir.display()))?;
        tracing::debug!("created {}", dir.display());
    }
    Ok(())
}

/// Where `url` lands inside `dir` when the caller gives no explicit path.
pub fn default_destination(url: &str, dir: &Path) -> PathBuf {
    dir.join(filename_for_url(url))
}
