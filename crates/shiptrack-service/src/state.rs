//! Application state for the HTTP service.
//!
//! The storage engine handle is opened once at startup and passed to every
//! handler through axum's `State` extractor, never through an ambient global,
//! so handlers stay independently testable.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shiptrack_lib::{Result, ShipmentStore};

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable (`Arc` internally). The store is serialized behind a
/// mutex: each request performs at most one short read-then-write sequence,
/// and SQLite provides the on-disk transaction guarantees.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<ShipmentStore>>,
}

impl AppState {
    /// Open the store at `db_path`, creating the schema if needed.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_store(ShipmentStore::open(db_path)?))
    }

    /// Build state over an in-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_store(ShipmentStore::open_in_memory()?))
    }

    /// Wrap an already-open store.
    pub fn from_store(store: ShipmentStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Lock the store for one request's operation.
    ///
    /// A poisoned lock is recovered rather than propagated: the store holds
    /// no in-process invariants beyond what SQLite enforces on disk.
    pub fn store(&self) -> MutexGuard<'_, ShipmentStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &*self.store())
            .finish()
    }
}
