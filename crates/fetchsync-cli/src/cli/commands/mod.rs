//! CLI command handlers, one file per command.

mod cat;
mod data_dir;
mod probe;
mod sync;

pub use cat::run_cat;
pub use data_dir::run_data_dir;
pub use probe::run_probe;
pub use sync::run_sync;
