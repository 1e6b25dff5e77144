use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::transport::TransportOptions;

/// Global configuration loaded from `~/.config/fetchsync/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Seconds allowed for connecting (and FTP login).
    pub connect_timeout_secs: u64,
    /// Overall limit per probe or fetch in seconds; unset means no limit.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Abort a transfer slower than this many bytes/s for `low_speed_time_secs` (0 disables).
    pub low_speed_limit: u32,
    pub low_speed_time_secs: u64,
    /// Maximum HTTP redirects followed.
    pub max_redirections: u32,
    /// Optional `User-Agent` for HTTP requests.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Default for the modification-time check when the caller does not say.
    #[serde(default = "default_check_modified")]
    pub check_modified: bool,
    /// Overrides the XDG data directory used for default destinations.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_check_modified() -> bool {
    true
}

impl Default for FetchConfig {
    fn default() -> Self {
        let transport = TransportOptions::default();
        Self {
            connect_timeout_secs: transport.connect_timeout.as_secs(),
            timeout_secs: transport.timeout.map(|d| d.as_secs()),
            low_speed_limit: transport.low_speed_limit,
            low_speed_time_secs: transport.low_speed_time.as_secs(),
            max_redirections: transport.max_redirections,
            user_agent: None,
            check_modified: true,
            data_dir: None,
        }
    }
}

impl FetchConfig {
    /// Network options for the transports.
    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: self.timeout_secs.map(Duration::from_secs),
            low_speed_limit: self.low_speed_limit,
            low_speed_time: Duration::from_secs(self.low_speed_time_secs),
            max_redirections: self.max_redirections,
            user_agent: self.user_agent.clone(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fetchsync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<FetchConfig> {
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)
            .with_context(|| format!("failed to write default config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let cfg: FetchConfig =
        toml::from_str(&data).with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(cfg)
}
