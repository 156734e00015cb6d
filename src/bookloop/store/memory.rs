use super::{Collection, CollectionLocks, RecordStore};
use crate::error::{BookloopError, Result};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// In-memory store for tests.
///
/// Documents are kept serialized so that decoding behaves exactly as it does on disk.
#[derive(Default)]
pub struct InMemoryStore {
    documents: Mutex<HashMap<Collection, String>>,
    locks: CollectionLocks,
    simulate_write_error: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a raw document, bypassing encoding (e.g. to simulate a corrupt file).
    pub fn seed(&self, collection: Collection, contents: impl Into<String>) {
        if let Ok(mut documents) = self.documents.lock() {
            documents.insert(collection, contents.into());
        }
    }

    /// The raw document as last written, if any.
    pub fn raw(&self, collection: Collection) -> Option<String> {
        self.documents
            .lock()
            .ok()
            .and_then(|documents| documents.get(&collection).cloned())
    }

    /// Make every subsequent write fail with an I/O error.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    fn documents(&self) -> Result<MutexGuard<'_, HashMap<Collection, String>>> {
        self.documents
            .lock()
            .map_err(|_| BookloopError::Store("In-memory documents are poisoned".to_string()))
    }
}

impl RecordStore for InMemoryStore {
    fn read_document(&self, collection: Collection) -> Result<Option<String>> {
        Ok(self.documents()?.get(&collection).cloned())
    }

    fn write_document(&self, collection: Collection, contents: &str) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(BookloopError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "simulated write failure",
            )));
        }
        self.documents()?.insert(collection, contents.to_string());
        Ok(())
    }

    fn lock(&self, collection: Collection) -> Result<MutexGuard<'_, ()>> {
        self.locks.acquire(collection)
    }
}
