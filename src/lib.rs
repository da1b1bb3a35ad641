pub mod ai;
pub mod config;
pub mod export;
pub mod manager;
pub mod model;
pub mod storage;
pub mod sync;
pub mod views;

use std::path::PathBuf;

/// Per-user directory holding the database and config file.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hungers-crm")
}

/// Wires up env-filtered logging; safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env().try_init();
}
