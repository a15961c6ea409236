//! In-memory vitals store

use std::{collections::BTreeMap, sync::Mutex};

use tracing::{debug, info};

use super::{NewVitalEntry, VitalEntry, VitalStore};
use crate::error::StoreError;

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    entries: BTreeMap<u64, VitalEntry>,
}

/// Vitals store kept in process memory
#[derive(Debug, Default)]
pub struct MemoryVitalStore {
    inner: Mutex<Inner>,
}

impl MemoryVitalStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl VitalStore for MemoryVitalStore {
    fn insert(&self, entry: NewVitalEntry) -> Result<VitalEntry, StoreError> {
        let mut inner = self.lock()?;
        inner.next_id += 1;
        let entry = entry.into_entry(inner.next_id);
        inner.entries.insert(entry.id, entry.clone());
        info!("Inserted vital entry {}", entry.id);
        Ok(entry)
    }

    fn update(&self, entry: VitalEntry) -> Result<VitalEntry, StoreError> {
        let mut inner = self.lock()?;
        let slot = inner
            .entries
            .get_mut(&entry.id)
            .ok_or(StoreError::NotFound(entry.id))?;
        *slot = entry.clone();
        debug!("Updated vital entry {}", entry.id);
        Ok(entry)
    }

    fn delete(&self, id: u64) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner
            .entries
            .remove(&id)
            .map(|_| debug!("Deleted vital entry {}", id))
            .ok_or(StoreError::NotFound(id))
    }

    fn delete_all(&self) -> Result<usize, StoreError> {
        let mut inner = self.lock()?;
        let removed = inner.entries.len();
        inner.entries.clear();
        info!("Deleted all {} vital entries", removed);
        Ok(removed)
    }

    fn list_all(&self) -> Result<Vec<VitalEntry>, StoreError> {
        let inner = self.lock()?;
        let mut entries: Vec<VitalEntry> = inner.entries.values().cloned().collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(entries)
    }
}
