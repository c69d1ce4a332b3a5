//! Snapshot-keyed cache of inverted value indexes
//!
//! - Keyed by (collection, instance, field, snapshot version); an index is
//!   never served for any other snapshot, even one of a re-created collection
//!   with the same name
//! - Entries are immutable and shared through `Arc`
//! - Inserting an index evicts every other snapshot's index of the same
//!   collection name and field
//! - Bounded; the oldest insertion is evicted first
//!
//! Caching never changes results: a miss builds exactly what a hit returns.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

use crate::collection::SnapshotReader;
use crate::join::JoinResult;

use super::inverted::ValueToDocsIndex;

/// Cache key for one built index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexCacheKey {
    pub collection: String,
    pub instance: Uuid,
    pub field: String,
    pub version: u64,
}

impl IndexCacheKey {
    pub fn new(
        collection: impl Into<String>,
        instance: Uuid,
        field: impl Into<String>,
        version: u64,
    ) -> Self {
        Self {
            collection: collection.into(),
            instance,
            field: field.into(),
            version,
        }
    }

    /// Key of the index `field` would have for `reader`'s snapshot
    pub fn for_snapshot(reader: &dyn SnapshotReader, field: &str) -> Self {
        Self::new(reader.collection(), reader.instance(), field, reader.version())
    }

    fn same_field(&self, other: &IndexCacheKey) -> bool {
        self.collection == other.collection && self.field == other.field
    }
}

/// Passive cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<IndexCacheKey, Arc<ValueToDocsIndex>>,
    order: VecDeque<IndexCacheKey>,
}

/// Bounded cache of inverted value indexes
#[derive(Debug)]
pub struct IndexCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl IndexCache {
    /// Creates a cache holding at most `capacity` indexes
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheInner::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Looks up an index for exactly this snapshot version
    pub fn get(&self, key: &IndexCacheKey) -> Option<Arc<ValueToDocsIndex>> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.entries.get(key).cloned()
    }

    /// Publishes a built index
    pub fn insert(&self, index: Arc<ValueToDocsIndex>) {
        if self.capacity == 0 {
            return;
        }
        let key = IndexCacheKey::new(
            index.collection(),
            index.instance(),
            index.field(),
            index.version(),
        );
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        // other snapshots of this name can no longer be requested alongside it
        let stale: Vec<IndexCacheKey> = inner
            .entries
            .keys()
            .filter(|k| k.same_field(&key) && *k != &key)
            .cloned()
            .collect();
        for k in &stale {
            inner.entries.remove(k);
        }
        inner.order.retain(|k| !stale.contains(k));

        if inner.entries.insert(key.clone(), index).is_none() {
            inner.order.push_back(key);
        }

        while inner.entries.len() > self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    /// Returns the cached index for `reader`'s snapshot or builds one.
    ///
    /// The boolean is true on a cache hit.
    pub fn get_or_build<F>(
        &self,
        reader: &dyn SnapshotReader,
        field: &str,
        build: F,
    ) -> JoinResult<(Arc<ValueToDocsIndex>, bool)>
    where
        F: FnOnce() -> JoinResult<ValueToDocsIndex>,
    {
        let key = IndexCacheKey::for_snapshot(reader, field);
        if let Some(index) = self.get(&key).filter(|index| index.matches_snapshot(reader)) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok((index, true));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let index = Arc::new(build()?);
        self.insert(Arc::clone(&index));
        Ok((index, false))
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: inner.entries.len(),
        }
    }
}
