use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::ai;
use crate::config::AppConfig;
use crate::export;
use crate::model::{Activity, ActivityKind, Country, Deal, DealStatus};
use crate::storage::Storage;
use crate::sync::{github, BackupConfig, SyncError, SyncResult, SyncState, SyncStatus};
use crate::views::{self, AgendaEntry, Filters, ViewSnapshot};

/// The whole application session in one place: the deal collection (the
/// single source of truth), view filters, backup configuration, sync
/// indicator, and the storage handle that mirrors every mutation.
pub struct PipelineManager {
    storage: Storage,
    config: AppConfig,
    pub deals: Vec<Deal>,
    pub filters: Filters,
    pub backup: BackupConfig,
    pub status: SyncStatus,
    pub last_sync: Option<String>,
    pub logged_in: bool,
}

pub type AppState = Arc<Mutex<PipelineManager>>;

impl PipelineManager {
    pub fn new(storage: Storage, config: AppConfig) -> Self {
        let deals = storage.load_deals();
        let backup = storage.load_backup_config();
        let last_sync = storage.load_last_sync();
        log::info!("Loaded {} deals from local storage", deals.len());
        Self {
            storage,
            config,
            deals,
            filters: Filters::default(),
            backup,
            status: SyncStatus::Idle,
            last_sync,
            logged_in: false,
        }
    }

    pub fn open(db_path: &Path, config: AppConfig) -> Result<AppState, String> {
        let storage = Storage::open(db_path)?;
        Ok(Arc::new(Mutex::new(Self::new(storage, config))))
    }

    fn is_syncing(&self) -> bool {
        self.status == SyncStatus::Syncing
    }

    fn stamp_sync_success(&mut self) {
        self.status = SyncStatus::Success;
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        if let Err(err) = self.storage.save_last_sync(&stamp) {
            log::warn!("Failed to persist last sync time: {}", err);
        }
        self.last_sync = Some(stamp);
    }
}

// ─── Session Gate (placeholder) ──────────────────────────────────────────────

/// Local access gate. Accepts any email with a password of at least four
/// characters; there is no real credential store behind it.
pub fn login(state: &AppState, email: &str, password: &str) -> Result<(), String> {
    if email.trim().is_empty() || password.len() < 4 {
        return Err("Credenciales inválidas.".to_string());
    }
    state.lock().logged_in = true;
    log::info!("Session opened for {}", email);
    Ok(())
}

pub fn logout(state: &AppState) {
    state.lock().logged_in = false;
}

/// Placeholder password-change flow: waits a fixed delay and reports
/// success without verifying anything. Not a security control; kept only
/// so the profile form has an endpoint until a real credential
/// collaborator exists.
pub async fn change_password(_current: &str, next: &str, confirm: &str) -> Result<(), String> {
    if next != confirm {
        return Err("Las contraseñas no coinciden.".to_string());
    }
    tokio::time::sleep(Duration::from_millis(1000)).await;
    Ok(())
}

// ─── Deal Mutations ──────────────────────────────────────────────────────────

/// Replaces the deal with the same id, or appends it when new. The saved
/// collection is mirrored to storage before returning.
pub fn upsert_deal(state: &AppState, deal: Deal) -> Result<Deal, String> {
    let mut mgr = state.lock();
    match mgr.deals.iter().position(|d| d.id == deal.id) {
        Some(index) => mgr.deals[index] = deal.clone(),
        None => mgr.deals.push(deal.clone()),
    }
    mgr.storage.save_deals(&mgr.deals)?;
    Ok(deal)
}

/// Moves a deal to another pipeline stage (the board's drag-and-drop).
pub fn move_deal(state: &AppState, deal_id: &str, stage: DealStatus) -> Result<(), String> {
    let mut mgr = state.lock();
    {
        let deal = mgr
            .deals
            .iter_mut()
            .find(|d| d.id == deal_id)
            .ok_or_else(|| format!("No existe el trato {}", deal_id))?;
        deal.status = stage;
    }
    mgr.storage.save_deals(&mgr.deals)
}

/// Appends an activity to a deal and mirrors its content into the deal's
/// next steps.
pub fn schedule_activity(
    state: &AppState,
    deal_id: &str,
    kind: ActivityKind,
    content: &str,
    date: &str,
) -> Result<Activity, String> {
    let mut mgr = state.lock();
    let activity = {
        let deal = mgr
            .deals
            .iter_mut()
            .find(|d| d.id == deal_id)
            .ok_or_else(|| format!("No existe el trato {}", deal_id))?;
        deal.schedule_activity(kind, content, date)
    };
    mgr.storage.save_deals(&mgr.deals)?;
    Ok(activity)
}

// ─── Filters & Views ─────────────────────────────────────────────────────────

pub fn set_search(state: &AppState, term: &str) {
    state.lock().filters.search = term.to_string();
}

pub fn set_country_filter(state: &AppState, country: Option<Country>) {
    state.lock().filters.country = country;
}

pub fn set_seller_filter(state: &AppState, seller: Option<String>) {
    state.lock().filters.seller = seller;
}

pub fn view_snapshot(state: &AppState) -> ViewSnapshot {
    let mgr = state.lock();
    views::snapshot(&mgr.deals, &mgr.filters)
}

pub fn agenda(state: &AppState) -> Vec<AgendaEntry> {
    let mgr = state.lock();
    views::upcoming_activities(&mgr.deals, chrono::Local::now().date_naive())
}

/// Writes the CSV report for the currently filtered deals into `dir`.
pub fn export_report(state: &AppState, dir: &Path) -> Result<PathBuf, String> {
    let filtered: Vec<Deal> = {
        let mgr = state.lock();
        views::filtered_deals(&mgr.deals, &mgr.filters)
            .into_iter()
            .cloned()
            .collect()
    };
    export::write_report(dir, &filtered)
}

// ─── Backup Configuration & Sync ─────────────────────────────────────────────

pub fn backup_config(state: &AppState) -> BackupConfig {
    state.lock().backup.clone()
}

pub fn update_backup_config(state: &AppState, config: BackupConfig) -> Result<(), String> {
    let mut mgr = state.lock();
    mgr.backup = config;
    mgr.storage.save_backup_config(&mgr.backup)
}

pub fn sync_state(state: &AppState) -> SyncState {
    let mgr = state.lock();
    SyncState {
        is_syncing: mgr.is_syncing(),
        last_sync: mgr.last_sync.clone(),
        status: mgr.status,
    }
}

/// Pushes the full local collection to the configured repository.
///
/// Only one push or pull can be in flight at a time. Configuration
/// problems are rejected before the guard flips and before any network
/// traffic, leaving the sync indicator untouched so the caller can route
/// the user to the settings form.
pub async fn push_backup(state: &AppState) -> Result<SyncResult, SyncError> {
    let (backup, deals) = {
        let mut mgr = state.lock();
        if mgr.is_syncing() {
            return Err(SyncError::Busy);
        }
        mgr.backup.validate()?;
        mgr.status = SyncStatus::Syncing;
        (mgr.backup.clone(), mgr.deals.clone())
    };

    match github::push_backup(&backup, &deals).await {
        Ok(result) => {
            let mut mgr = state.lock();
            mgr.stamp_sync_success();
            log::info!("Pushed {} deals to {}", deals.len(), backup.repo);
            Ok(result)
        }
        Err(err) => {
            state.lock().status = SyncStatus::Error;
            log::error!("Backup push failed: {}", err);
            Err(err)
        }
    }
}

/// A fetched remote collection awaiting the user's confirmation. Applying
/// it is destructive, so the exchange is split in two phases: request,
/// then confirm or cancel.
#[derive(Debug, Clone)]
pub struct PendingRestore {
    pub deals: Vec<Deal>,
    pub fetched_at: String,
}

/// Phase one of a restore: validate, fetch, and decode the remote backup.
/// The sync guard stays engaged until `confirm_restore` or
/// `cancel_restore` resolves the pending descriptor; local deals are not
/// touched here.
pub async fn request_restore(state: &AppState) -> Result<PendingRestore, SyncError> {
    let backup = {
        let mut mgr = state.lock();
        if mgr.is_syncing() {
            return Err(SyncError::Busy);
        }
        mgr.backup.validate()?;
        mgr.status = SyncStatus::Syncing;
        mgr.backup.clone()
    };

    match github::pull_backup(&backup).await {
        Ok(deals) => Ok(PendingRestore {
            deals,
            fetched_at: chrono::Utc::now().to_rfc3339(),
        }),
        Err(err) => {
            state.lock().status = SyncStatus::Error;
            log::error!("Backup pull failed: {}", err);
            Err(err)
        }
    }
}

/// Phase two, confirmed: the remote collection replaces the local one
/// wholesale and is persisted immediately.
pub fn confirm_restore(state: &AppState, pending: PendingRestore) -> Result<SyncResult, String> {
    let mut mgr = state.lock();
    mgr.deals = pending.deals;
    mgr.storage.save_deals(&mgr.deals)?;
    mgr.stamp_sync_success();
    log::info!("Restored {} deals from remote backup", mgr.deals.len());
    Ok(SyncResult {
        success: true,
        message: "Datos restaurados exitosamente desde GitHub.".to_string(),
    })
}

/// Phase two, declined: drop the fetched data and release the guard with
/// no other state change.
pub fn cancel_restore(state: &AppState) {
    let mut mgr = state.lock();
    if mgr.is_syncing() {
        mgr.status = SyncStatus::Idle;
    }
}

// ─── Advisory ────────────────────────────────────────────────────────────────

/// Requests a closing-strategy suggestion for one deal. The result is
/// session-local text; it is never persisted.
pub async fn analyze_deal(state: &AppState, deal_id: &str) -> Result<String, String> {
    let (config, deal) = {
        let mgr = state.lock();
        let deal = mgr
            .deals
            .iter()
            .find(|d| d.id == deal_id)
            .cloned()
            .ok_or_else(|| format!("No existe el trato {}", deal_id))?;
        (mgr.config.clone(), deal)
    };
    Ok(ai::analyze_deal(&config, &deal).await)
}
