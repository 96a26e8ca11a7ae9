//! Lead store with a key-value persistence mirror
//!
//! The store owns the authoritative lead sequence for a session. It is
//! created once, either from a persisted snapshot or from the bundled CSV,
//! and afterwards only lead statuses change. Every change is mirrored to the
//! injected [`KeyValueStore`]; mirror failures are logged and never surface.

use crate::codec;
use crate::error::{LeadError, StorageError};
use crate::lead::{Lead, LeadStatus};
use crate::summary::LeadSummary;
use std::collections::{HashMap, HashSet};

/// Minimal string key-value storage (browser `localStorage` in production)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory [`KeyValueStore`]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a single entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Pending,
    Loaded,
}

/// Ordered lead collection for one session
#[derive(Debug)]
pub struct LeadStore<S: KeyValueStore> {
    storage: S,
    key: String,
    leads: Vec<Lead>,
    state: LoadState,
}

impl<S: KeyValueStore> LeadStore<S> {
    /// Create an unloaded store that persists under `key`
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            leads: Vec::new(),
            state: LoadState::Pending,
        }
    }

    /// Load the session's leads
    ///
    /// Prefers a non-empty persisted snapshot; otherwise decodes whatever
    /// `fetch` returns. Only the first call does any work.
    pub fn initialize<F>(&mut self, fetch: F) -> &[Lead]
    where
        F: FnOnce() -> Result<String, LeadError>,
    {
        if self.state == LoadState::Pending && !self.restore() {
            self.adopt_source(fetch());
        }
        &self.leads
    }

    /// Try to load from the persisted snapshot
    ///
    /// Returns true when the store is loaded afterwards, meaning no fetch of
    /// the bundled data is needed.
    pub fn restore(&mut self) -> bool {
        if self.state == LoadState::Loaded {
            return true;
        }

        match self.read_snapshot() {
            Ok(Some(leads)) if !leads.is_empty() => {
                if !has_unique_ids(&leads) {
                    tracing::warn!("Ignoring snapshot with missing or duplicate lead ids");
                    return false;
                }
                tracing::info!("Restored {} leads from snapshot", leads.len());
                self.leads = leads;
                self.state = LoadState::Loaded;
                true
            }
            Ok(_) => false,
            Err(err) => {
                tracing::warn!("Ignoring unreadable snapshot: {}", err);
                false
            }
        }
    }

    /// Finish loading with the result of fetching the bundled CSV
    ///
    /// A fetch error still leaves the store loaded, with no leads.
    pub fn adopt_source(&mut self, source: Result<String, LeadError>) -> &[Lead] {
        if self.state == LoadState::Loaded {
            return &self.leads;
        }

        self.leads = match source {
            Ok(text) => codec::decode(&text),
            Err(err) => {
                tracing::error!("Lead data unavailable: {}", err);
                Vec::new()
            }
        };
        self.state = LoadState::Loaded;
        tracing::info!("Loaded {} leads from source", self.leads.len());

        self.persist();
        &self.leads
    }

    fn read_snapshot(&self) -> Result<Option<Vec<Lead>>, LeadError> {
        match self.storage.get(&self.key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Replace the status of the lead with `id`
    ///
    /// Unknown ids are ignored and nothing is persisted for them.
    pub fn set_status(&mut self, id: &str, status: LeadStatus) {
        let Some(lead) = self.leads.iter_mut().find(|l| l.id == id) else {
            tracing::debug!("set_status: no lead with id {}", id);
            return;
        };

        lead.status = status;
        self.persist();
    }

    /// Advance the lead with `id` one step through the status cycle
    pub fn cycle(&mut self, id: &str) -> Option<LeadStatus> {
        let next = self.get(id)?.status.cycle();
        self.set_status(id, next);
        Some(next)
    }

    /// Drop all leads and the snapshot so the next load re-reads the source
    pub fn reset(&mut self) {
        self.leads.clear();
        self.state = LoadState::Pending;
        if let Err(err) = self.storage.set(&self.key, "[]") {
            tracing::error!("Failed to clear lead snapshot: {}", err);
        }
    }

    fn persist(&mut self) {
        if self.leads.is_empty() {
            return;
        }

        let json = match serde_json::to_string(&self.leads) {
            Ok(json) => json,
            Err(err) => {
                tracing::error!("Failed to serialize lead snapshot: {}", err);
                return;
            }
        };

        if let Err(err) = self.storage.set(&self.key, &json) {
            tracing::error!("Failed to save lead snapshot: {}", err);
        }
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn get(&self, id: &str) -> Option<&Lead> {
        self.leads.iter().find(|l| l.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.leads.iter().position(|l| l.id == id)
    }

    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    /// Leads currently marked `Approved`, in sequence order
    pub fn approved(&self) -> Vec<&Lead> {
        self.leads
            .iter()
            .filter(|l| l.status == LeadStatus::Approved)
            .collect()
    }

    pub fn summary(&self) -> LeadSummary {
        LeadSummary::from_leads(&self.leads)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

/// Every lead has a non-empty id and no id repeats
fn has_unique_ids(leads: &[Lead]) -> bool {
    let mut seen = HashSet::with_capacity(leads.len());
    leads.iter().all(|l| !l.id.is_empty() && seen.insert(l.id.as_str()))
}
