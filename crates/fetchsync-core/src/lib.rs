//! Conditional file-fetch cache.
//!
//! Mirrors a remote HTTP(S) or FTP(S) resource into a local file and
//! re-downloads only when the remote copy is newer or a different size.
//! Entry points live in [`cache`].

pub mod config;
pub mod logging;

pub mod cache;
pub mod data_dir;
pub mod error;
pub mod metadata;
pub mod resource;
pub mod staleness;
pub mod storage;
pub mod transport;

pub use cache::{open_synced, sync, with_synced, Cache, SyncOutcome, SyncedFile};
pub use error::{FetchError, TransportError};
