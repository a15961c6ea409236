//! Vitals store
//!
//! The durable list of vital-sign entries is an external collaborator of the
//! timer; this module defines its interface and an in-memory implementation.
//! A handle is built once in `main` and passed into [`crate::state::AppState`].

pub mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub use memory::MemoryVitalStore;

/// One recorded set of measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalEntry {
    pub id: u64,
    #[serde(rename = "systolicBP")]
    pub systolic_bp: u32,
    #[serde(rename = "diastolicBP")]
    pub diastolic_bp: u32,
    pub heart_rate: u32,
    pub weight: f64,
    pub baby_kicks: u32,
    pub timestamp: DateTime<Utc>,
}

/// Measurements for an entry that has not been stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVitalEntry {
    #[serde(rename = "systolicBP")]
    pub systolic_bp: u32,
    #[serde(rename = "diastolicBP")]
    pub diastolic_bp: u32,
    pub heart_rate: u32,
    pub weight: f64,
    pub baby_kicks: u32,
    /// Defaults to the insertion time
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewVitalEntry {
    pub(crate) fn into_entry(self, id: u64) -> VitalEntry {
        VitalEntry {
            id,
            systolic_bp: self.systolic_bp,
            diastolic_bp: self.diastolic_bp,
            heart_rate: self.heart_rate,
            weight: self.weight,
            baby_kicks: self.baby_kicks,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        }
    }
}

/// CRUD interface over stored entries
pub trait VitalStore: Send + Sync {
    /// Store a new entry and return it with its assigned id
    fn insert(&self, entry: NewVitalEntry) -> Result<VitalEntry, StoreError>;

    /// Replace the entry with the same id
    fn update(&self, entry: VitalEntry) -> Result<VitalEntry, StoreError>;

    /// Remove one entry by id
    fn delete(&self, id: u64) -> Result<(), StoreError>;

    /// Remove every entry, returning how many were removed
    fn delete_all(&self) -> Result<usize, StoreError>;

    /// All entries, newest first
    fn list_all(&self) -> Result<Vec<VitalEntry>, StoreError>;
}
