//! # Transactional Store
//!
//! `LandStore` wraps the [`Tables`] in a single `RwLock` and exposes a
//! closure-based transaction: the closure runs against a clone of the
//! tables under the write lock, and the clone replaces the live tables
//! only when the closure returns `Ok`. An `Err` discards the clone, so
//! rollback is total and there are no partially applied mutations to
//! clean up.
//!
//! Check-then-act invariants (duplicate folio, single pending transfer)
//! hold because the check and the mutation share the write lock. Ledger
//! mirroring happens strictly after the lock is released.

use std::sync::RwLock;

use folio_core::RegistryError;

use crate::tables::Tables;

/// The shared, transactional registry store.
#[derive(Debug, Default)]
pub struct LandStore {
    tables: RwLock<Tables>,
}

impl LandStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with existing tables (snapshot restore).
    pub fn from_tables(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Run a mutating transaction.
    ///
    /// The closure receives a clone of the current tables; the clone is
    /// swapped in only on `Ok`. Validation, authorization, and conflict
    /// checks performed inside the closure therefore abort with zero side
    /// effects.
    pub fn transaction<T, F>(&self, f: F) -> Result<T, RegistryError>
    where
        F: FnOnce(&mut Tables) -> Result<T, RegistryError>,
    {
        let mut guard = match self.tables.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut working = guard.clone();
        match f(&mut working) {
            Ok(value) => {
                *guard = working;
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(error = %err, "transaction rolled back");
                Err(err)
            }
        }
    }

    /// Run a read-only query under the read lock.
    pub fn read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&Tables) -> T,
    {
        let guard = match self.tables.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&guard)
    }

    /// Clone out the full table state (snapshot persistence).
    pub fn snapshot(&self) -> Tables {
        self.read(Clone::clone)
    }
}
