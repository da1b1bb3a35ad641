use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::model::{self, Deal};
use crate::sync::BackupConfig;

/// Namespace keys of the three locally persisted documents.
pub const DEALS_KEY: &str = "hungers_crm_deals_v1";
pub const BACKUP_CONFIG_KEY: &str = "hungers_crm_github_config";
pub const LAST_SYNC_KEY: &str = "last_github_sync";

/// Durable key/value store backing the deal collection and the backup
/// configuration. Writes happen synchronously on every mutation; the
/// in-memory collection stays the source of truth and is only mirrored
/// here.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(db_path: &Path) -> Result<Self, String> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create data dir: {}", e))?;
        }
        let conn = Connection::open(db_path)
            .map_err(|e| format!("Failed to open database: {}", e))?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .map_err(|e| format!("Failed to create tables: {}", e))?;

        Ok(Self { conn })
    }

    pub fn default_path() -> PathBuf {
        crate::default_data_dir().join("crm.db")
    }

    fn read_key(&self, key: &str) -> Option<String> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .ok()
            .flatten()
    }

    fn write_key(&self, key: &str, value: &str) -> Result<(), String> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv_store (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(|e| format!("Failed to persist {}: {}", key, e))?;
        Ok(())
    }

    /// The stored deal collection; a missing or unreadable document yields
    /// the seed dataset, never an error.
    pub fn load_deals(&self) -> Vec<Deal> {
        match self.read_key(DEALS_KEY) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Stored deals unreadable, falling back to seed data: {}", e);
                model::seed_deals()
            }),
            None => model::seed_deals(),
        }
    }

    pub fn save_deals(&self, deals: &[Deal]) -> Result<(), String> {
        let raw = serde_json::to_string(deals)
            .map_err(|e| format!("Failed to serialize deals: {}", e))?;
        self.write_key(DEALS_KEY, &raw)
    }

    pub fn load_backup_config(&self) -> BackupConfig {
        match self.read_key(BACKUP_CONFIG_KEY) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Stored backup config unreadable, using defaults: {}", e);
                BackupConfig::default()
            }),
            None => BackupConfig::default(),
        }
    }

    pub fn save_backup_config(&self, config: &BackupConfig) -> Result<(), String> {
        let raw = serde_json::to_string(config)
            .map_err(|e| format!("Failed to serialize backup config: {}", e))?;
        self.write_key(BACKUP_CONFIG_KEY, &raw)
    }

    pub fn load_last_sync(&self) -> Option<String> {
        self.read_key(LAST_SYNC_KEY)
    }

    pub fn save_last_sync(&self, stamp: &str) -> Result<(), String> {
        self.write_key(LAST_SYNC_KEY, stamp)
    }
}
