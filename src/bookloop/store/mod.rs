//! # Storage Layer
//!
//! Every collection of the marketplace (books, users, the profit ledger) lives in its own
//! JSON document. The [`RecordStore`] trait loads and saves a whole document per call;
//! there is no partial update and no cache, so each operation sees the latest contents.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage, one file per collection in a data directory
//! - [`memory::InMemoryStore`]: serialized documents held in memory, for tests
//!
//! ## Storage Format
//!
//! ```text
//! <data-dir>/
//! ├── books.json          # list of book records
//! ├── users.json          # username -> { password, role }
//! ├── admin_profit.json   # { total_profit, transactions }
//! └── config.json         # optional configuration
//! ```
//!
//! ## Locking
//!
//! Backends hand out one lock per collection. [`RecordStore::update`] holds it across the
//! whole load-modify-save cycle, so threads sharing a store cannot overwrite each other's
//! changes. The lock is process-local: two processes writing the same directory still race,
//! and the last writer wins.

use crate::error::{BookloopError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

pub mod fs;
pub mod memory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    Books,
    Users,
    Profit,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collection::Books => "books",
            Collection::Users => "users",
            Collection::Profit => "profit",
        };
        f.write_str(name)
    }
}

/// One mutex per collection.
#[derive(Debug, Default)]
pub struct CollectionLocks {
    books: Mutex<()>,
    users: Mutex<()>,
    profit: Mutex<()>,
}

impl CollectionLocks {
    pub fn acquire(&self, collection: Collection) -> Result<MutexGuard<'_, ()>> {
        let slot = match collection {
            Collection::Books => &self.books,
            Collection::Users => &self.users,
            Collection::Profit => &self.profit,
        };
        slot.lock()
            .map_err(|_| BookloopError::Store(format!("Lock for {} is poisoned", collection)))
    }
}

/// Whole-document persistence for the marketplace collections.
///
/// Backends only provide raw document I/O and locking; encoding, decoding and the
/// read-modify-write cycle are shared.
pub trait RecordStore: Send + Sync {
    /// Read the raw document. `Ok(None)` means it does not exist yet.
    fn read_document(&self, collection: Collection) -> Result<Option<String>>;

    /// Replace the raw document in full.
    fn write_document(&self, collection: Collection, contents: &str) -> Result<()>;

    /// Take the collection's lock.
    fn lock(&self, collection: Collection) -> Result<MutexGuard<'_, ()>>;

    /// Load a collection, or `default` if it has never been written.
    fn load<T: DeserializeOwned>(&self, collection: Collection, default: T) -> Result<T> {
        let _guard = self.lock(collection)?;
        read_or_default(self, collection, default)
    }

    /// Serialize and overwrite a collection.
    fn save<T: Serialize>(&self, collection: Collection, records: &T) -> Result<()> {
        let _guard = self.lock(collection)?;
        write_records(self, collection, records)
    }

    /// Load, modify and save a collection while holding its lock.
    ///
    /// The document is only rewritten when `apply` actually changed the value, so no-op
    /// operations leave the file untouched (and absent files absent).
    fn update<T, R, F>(&self, collection: Collection, default: T, apply: F) -> Result<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> Result<R>,
    {
        let _guard = self.lock(collection)?;
        let mut records = read_or_default(self, collection, default)?;
        let before = serde_json::to_value(&records)?;
        let outcome = apply(&mut records)?;
        if serde_json::to_value(&records)? != before {
            write_records(self, collection, &records)?;
        } else {
            debug!(%collection, "no changes, skipping write");
        }
        Ok(outcome)
    }
}

fn read_or_default<S, T>(store: &S, collection: Collection, default: T) -> Result<T>
where
    S: RecordStore + ?Sized,
    T: DeserializeOwned,
{
    match store.read_document(collection)? {
        None => {
            debug!(%collection, "document absent, using default");
            Ok(default)
        }
        Some(contents) => serde_json::from_str(&contents)
            .map_err(|source| BookloopError::Decode { collection, source }),
    }
}

fn write_records<S, T>(store: &S, collection: Collection, records: &T) -> Result<()>
where
    S: RecordStore + ?Sized,
    T: Serialize,
{
    let contents = serde_json::to_string_pretty(records)?;
    store.write_document(collection, &contents)?;
    debug!(%collection, bytes = contents.len(), "document written");
    Ok(())
}
