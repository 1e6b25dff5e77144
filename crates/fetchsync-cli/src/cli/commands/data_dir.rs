//! `fetchsync data-dir` – print the data directory.

use anyhow::Result;
use std::path::Path;

pub fn run_data_dir(dir: &Path) -> Result<()> {
    println!("{}", dir.display());
    Ok(())
}
