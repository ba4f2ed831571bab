//! In-memory dataset with write-through persistence.
//!
//! The whole dataset lives under [`STORAGE_KEY`] as one JSON document. A
//! [`Store`] loads it once when opened, serves reads from memory and saves
//! the full document after every mutation. A failed save is returned to the
//! caller; the in-memory change is kept and marks the store dirty, so
//! [`Store::close`] retries it. A clean store never writes on close.

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::db::KeyValueStore;
use crate::error::{Result, StorageError};
use crate::models::{generate_id, AiSettings, Dataset, SettingsUpdate, TaskStatus, DATA_VERSION};

mod cases;
mod contacts;
mod insights;
mod janitor;
pub mod migrate;
mod tasks;

pub use janitor::{CleanupSchedule, DEFAULT_CLEANUP_INTERVAL_HOURS};

/// Key holding the serialized dataset
pub const STORAGE_KEY: &str = "lifeos_data";

/// Load the dataset from `kv`.
///
/// - Nothing stored: import from the legacy per-entity keys, saving the
///   result if anything was imported.
/// - Stored payload is not JSON: log and start from an empty dataset.
/// - Version tag differs, or the payload no longer fits the current shape:
///   migrate, then save the upgraded payload.
pub fn load_data<K: KeyValueStore + ?Sized>(kv: &K) -> Result<Dataset> {
    let now = Utc::now();

    let Some(raw) = kv.get(STORAGE_KEY)? else {
        let (mut data, report) = migrate::migrate_legacy(kv, now);
        if report.imported() > 0 {
            info!(
                tasks = report.tasks,
                cases = report.cases,
                contacts = report.contacts,
                "imported legacy data"
            );
            save_data(kv, &mut data)?;
        }
        return Ok(data);
    };

    let value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "stored data is not valid JSON, starting empty");
            return Ok(Dataset::default());
        }
    };

    let version = value.get("version").and_then(Value::as_str);
    if version == Some(DATA_VERSION) {
        match Dataset::deserialize(&value) {
            Ok(data) => return Ok(data),
            Err(e) => warn!(error = %e, "stored data does not match current shape, repairing"),
        }
    } else {
        info!(from = version.unwrap_or("none"), to = DATA_VERSION, "migrating stored data");
    }

    let mut data = migrate::migrate_version(value, now);
    save_data(kv, &mut data)?;
    Ok(data)
}

/// Stamp `lastUpdated` and the current version onto `data`, then write it.
pub fn save_data<K: KeyValueStore + ?Sized>(kv: &K, data: &mut Dataset) -> Result<()> {
    data.last_updated = Some(Utc::now());
    data.version = DATA_VERSION.to_string();

    let result = serde_json::to_string(data)
        .map_err(StorageError::from)
        .and_then(|json| kv.set(STORAGE_KEY, &json));

    if let Err(ref e) = result {
        error!(error = %e, "failed to save data");
    }
    result
}

/// Counts backing the "status" view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub tasks_by_status: Vec<(TaskStatus, usize)>,
    pub overdue_tasks: usize,
    pub active_cases: usize,
    pub contacts: usize,
    pub open_insights: usize,
}

impl Summary {
    pub fn open_tasks(&self) -> usize {
        self.tasks_by_status
            .iter()
            .filter(|(status, _)| *status != TaskStatus::Done)
            .map(|(_, n)| n)
            .sum()
    }
}

pub struct Store<K: KeyValueStore> {
    kv: K,
    data: Dataset,
    /// In-memory changes not yet persisted
    dirty: bool,
}

impl<K: KeyValueStore> Store<K> {
    /// Load the dataset and purge expired insights.
    pub fn open(kv: K) -> Result<Self> {
        let data = load_data(&kv)?;
        let mut store = Self {
            kv,
            data,
            dirty: false,
        };
        store.cleanup_old_insights()?;
        Ok(store)
    }

    pub fn data(&self) -> &Dataset {
        &self.data
    }

    pub fn settings(&self) -> &AiSettings {
        &self.data.ai_settings
    }

    pub fn backend(&self) -> &K {
        &self.kv
    }

    /// Write the current dataset. Stays dirty if the write fails.
    pub fn save(&mut self) -> Result<()> {
        self.dirty = true;
        save_data(&self.kv, &mut self.data)?;
        self.dirty = false;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replace the in-memory dataset with what is currently stored. Used by
    /// long-running callers so another process's writes are not clobbered
    /// by a stale copy.
    /// Unsaved changes are discarded.
    pub fn reload(&mut self) -> Result<()> {
        self.data = load_data(&self.kv)?;
        self.dirty = false;
        Ok(())
    }

    /// Flush changes a failed save left behind, then hand the backend back.
    /// A clean store writes nothing, so another process's writes survive.
    pub fn close(mut self) -> Result<K> {
        if self.dirty {
            self.save()?;
        }
        Ok(self.kv)
    }

    pub fn update_settings(&mut self, update: SettingsUpdate) -> Result<AiSettings> {
        update.apply(&mut self.data.ai_settings);
        self.save()?;
        Ok(self.data.ai_settings.clone())
    }

    pub fn summary(&self) -> Summary {
        let now = Utc::now();
        let tasks_by_status = TaskStatus::all()
            .iter()
            .map(|status| {
                let n = self.data.tasks.iter().filter(|t| t.status == *status).count();
                (*status, n)
            })
            .collect();

        Summary {
            tasks_by_status,
            overdue_tasks: self.data.tasks.iter().filter(|t| t.is_overdue(now)).count(),
            active_cases: self.data.cases.iter().filter(|c| c.is_active()).count(),
            contacts: self.data.contacts.len(),
            open_insights: self.data.ai_insights.iter().filter(|i| i.is_open()).count(),
        }
    }

    /// Replace `id` until it collides with nothing already stored.
    fn fresh_id(&self, mut id: String) -> String {
        while self.data.contains_id(&id) {
            id = generate_id();
        }
        id
    }
}
