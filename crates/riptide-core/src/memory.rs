//! In-process reference store.

use std::{
    collections::{HashMap, HashSet},
    convert::Infallible,
    sync::Arc,
};

use parking_lot::Mutex;

use crate::{CacheKey, CacheStore, CacheValue, EntityKind};

/// In-memory [`CacheStore`] backed by a mutex-guarded map.
///
/// Reference implementation for tests and the CLI. Clones share the same
/// underlying map, so one handle can be given to a connection task while
/// another observes the results.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: Mutex<HashMap<CacheKey, CacheValue>>,
    stale: Mutex<HashSet<EntityKind>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `kind` has been invalidated since the last [`mark_fresh`].
    ///
    /// [`mark_fresh`]: Self::mark_fresh
    pub fn is_stale(&self, kind: EntityKind) -> bool {
        self.inner.stale.lock().contains(&kind)
    }

    /// Clear the stale flag for `kind`.
    ///
    /// Called by whatever owns the refetch pipeline once it has refetched
    /// the family.
    pub fn mark_fresh(&self, kind: EntityKind) {
        self.inner.stale.lock().remove(&kind);
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.lock().is_empty()
    }
}

impl CacheStore for MemoryStore {
    type Error = Infallible;

    fn read(&self, key: &CacheKey) -> Result<Option<CacheValue>, Self::Error> {
        Ok(self.inner.entries.lock().get(key).cloned())
    }

    fn write<F>(&self, key: CacheKey, update: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Option<CacheValue>),
    {
        let mut entries = self.inner.entries.lock();
        // The slot is taken out and reinserted so the updater sees plain
        // Option semantics while the lock keeps the step atomic per key.
        let mut slot = entries.remove(&key);
        update(&mut slot);
        if let Some(value) = slot {
            entries.insert(key, value);
        }
        Ok(())
    }

    fn invalidate(&self, kind: EntityKind) -> Result<(), Self::Error> {
        self.inner.stale.lock().insert(kind);
        Ok(())
    }
}
