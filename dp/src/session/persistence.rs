//! Persistence port
//!
//! The session only needs user-scoped get/put of text records. The
//! file-backed [`ProfileStore`] serves the CLI; [`MemoryStore`] serves tests
//! and embedders that keep nothing on disk.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use eyre::{Result, eyre};
use profilestore::ProfileStore;

use super::identity::UserId;

/// User-scoped key-value persistence
pub trait PersistencePort: Send + Sync {
    /// Read a record, `None` if it was never written
    fn load(&self, user: &UserId, key: &str) -> Result<Option<String>>;

    /// Write a record, replacing any previous value
    fn save(&self, user: &UserId, key: &str, value: &str) -> Result<()>;
}

impl PersistencePort for ProfileStore {
    fn load(&self, user: &UserId, key: &str) -> Result<Option<String>> {
        self.get(user.as_str(), key)
    }

    fn save(&self, user: &UserId, key: &str, value: &str) -> Result<()> {
        self.put(user.as_str(), key, value)
    }
}

/// In-memory persistence with a write counter
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<(String, String), String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Stored value, bypassing the port
    pub fn raw(&self, user: &str, key: &str) -> Option<String> {
        self.records
            .lock()
            .ok()?
            .get(&(user.to_string(), key.to_string()))
            .cloned()
    }
}

impl PersistencePort for MemoryStore {
    fn load(&self, user: &UserId, key: &str) -> Result<Option<String>> {
        let records = self.records.lock().map_err(|_| eyre!("memory store lock poisoned"))?;
        Ok(records.get(&(user.to_string(), key.to_string())).cloned())
    }

    fn save(&self, user: &UserId, key: &str, value: &str) -> Result<()> {
        let mut records = self.records.lock().map_err(|_| eyre!("memory store lock poisoned"))?;
        records.insert((user.to_string(), key.to_string()), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl<T: PersistencePort + ?Sized> PersistencePort for std::sync::Arc<T> {
    fn load(&self, user: &UserId, key: &str) -> Result<Option<String>> {
        (**self).load(user, key)
    }

    fn save(&self, user: &UserId, key: &str, value: &str) -> Result<()> {
        (**self).save(user, key, value)
    }
}
