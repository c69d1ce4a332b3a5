//! Collection resolution
//!
//! Maps an optional collection reference to the snapshot a query should read.
//! Resolution is injected through [`CollectionResolver`] rather than looked
//! up globally, so tests can substitute fake collections.

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;
use std::time::Duration;

use crate::observability::Logger;

use super::errors::{CollectionError, CollectionResult};
use super::snapshot::SharedSnapshot;
use super::store::Collection;

/// Resolves collection names to searchable snapshots
pub trait CollectionResolver: Send + Sync {
    /// Resolves a named collection to its current snapshot
    fn resolve(&self, name: &str) -> CollectionResult<SharedSnapshot>;

    /// Resolves an optional reference, defaulting to `default`.
    ///
    /// A reference naming the default's own collection reuses the default
    /// snapshot so one query never mixes two versions of a collection.
    fn resolve_or_default(
        &self,
        reference: Option<&str>,
        default: &SharedSnapshot,
    ) -> CollectionResult<SharedSnapshot> {
        match reference {
            None => Ok(Arc::clone(default)),
            Some(name) if name == default.collection() => Ok(Arc::clone(default)),
            Some(name) => self.resolve(name),
        }
    }
}

impl<R: CollectionResolver + ?Sized> CollectionResolver for Arc<R> {
    fn resolve(&self, name: &str) -> CollectionResult<SharedSnapshot> {
        (**self).resolve(name)
    }
}

/// In-process registry of named collections
#[derive(Debug, Default)]
pub struct CollectionRegistry {
    collections: RwLock<BTreeMap<String, Arc<Collection>>>,
}

impl CollectionRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the named collection, creating it if absent
    pub fn create(&self, name: &str) -> Arc<Collection> {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            collections
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Collection::new(name))),
        )
    }

    /// Registers an existing collection, replacing any with the same name
    pub fn register(&self, collection: Arc<Collection>) {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        collections.insert(collection.name().to_string(), collection);
    }

    /// Looks up a collection by name
    pub fn get(&self, name: &str) -> Option<Arc<Collection>> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        collections.get(name).cloned()
    }

    /// Registered collection names in ascending order
    pub fn names(&self) -> Vec<String> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        collections.keys().cloned().collect()
    }
}

impl CollectionResolver for CollectionRegistry {
    fn resolve(&self, name: &str) -> CollectionResult<SharedSnapshot> {
        let collection = self
            .get(name)
            .ok_or_else(|| CollectionError::NotFound(name.to_string()))?;
        let snapshot: SharedSnapshot = collection.snapshot();
        Ok(snapshot)
    }
}

/// Bounds the time spent resolving a collection.
///
/// Each resolution runs on a worker thread. If no answer arrives before the
/// timeout the call fails with `Unavailable`; a late answer is discarded.
/// Failures are never retried here.
pub struct TimeoutResolver<R> {
    inner: Arc<R>,
    timeout: Duration,
}

impl<R> TimeoutResolver<R>
where
    R: CollectionResolver + 'static,
{
    /// Wraps `inner` with the given timeout
    pub fn new(inner: Arc<R>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Returns the configured timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn unavailable(&self, name: &str) -> CollectionError {
        CollectionError::Unavailable {
            name: name.to_string(),
            timeout_ms: self.timeout.as_millis() as u64,
        }
    }
}

impl<R> CollectionResolver for TimeoutResolver<R>
where
    R: CollectionResolver + 'static,
{
    fn resolve(&self, name: &str) -> CollectionResult<SharedSnapshot> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let owned = name.to_string();

        thread::Builder::new()
            .name("collection-resolve".to_string())
            .spawn(move || {
                // receiver may have given up already
                let _ = tx.send(inner.resolve(&owned));
            })
            .map_err(|_| self.unavailable(name))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = self.timeout.as_millis().to_string();
                Logger::warn(
                    "COLLECTION_RESOLVE_TIMEOUT",
                    &[("collection", name), ("timeout_ms", timeout_ms.as_str())],
                );
                Err(self.unavailable(name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct SlowResolver {
        delay: Duration,
        registry: CollectionRegistry,
    }

    impl CollectionResolver for SlowResolver {
        fn resolve(&self, name: &str) -> CollectionResult<SharedSnapshot> {
            thread::sleep(self.delay);
            self.registry.resolve(name)
        }
    }

    fn registry_with(names: &[&str]) -> CollectionRegistry {
        let registry = CollectionRegistry::new();
        for name in names {
            registry.create(name).add(json!({"id": "1"})).unwrap();
        }
        registry
    }

    #[test]
    fn test_resolve_known_collection() {
        let registry = registry_with(&["people"]);
        let snap = registry.resolve("people").unwrap();
        assert_eq!(snap.collection(), "people");
        assert_eq!(snap.num_docs(), 1);
    }

    #[test]
    fn test_resolve_unknown_collection() {
        let registry = registry_with(&["people"]);
        let err = registry.resolve("nope").err().unwrap();
        assert_eq!(err, CollectionError::NotFound("nope".into()));
    }

    #[test]
    fn test_no_reference_uses_default() {
        let registry = registry_with(&["people", "depts"]);
        let default = registry.resolve("people").unwrap();

        let resolved = registry.resolve_or_default(None, &default).unwrap();
        assert!(Arc::ptr_eq(&resolved, &default));

        let named_self = registry.resolve_or_default(Some("people"), &default).unwrap();
        assert!(Arc::ptr_eq(&named_self, &default));

        let other = registry.resolve_or_default(Some("depts"), &default).unwrap();
        assert_eq!(other.collection(), "depts");
    }

    #[test]
    fn test_create_is_idempotent() {
        let registry = CollectionRegistry::new();
        let a = registry.create("x");
        let b = registry.create("x");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.names(), vec!["x".to_string()]);
    }

    #[test]
    fn test_timeout_resolver_passes_through() {
        let slow = SlowResolver {
            delay: Duration::from_millis(0),
            registry: registry_with(&["depts"]),
        };
        let resolver = TimeoutResolver::new(Arc::new(slow), Duration::from_secs(5));
        assert_eq!(resolver.resolve("depts").unwrap().collection(), "depts");
        assert!(matches!(
            resolver.resolve("missing"),
            Err(CollectionError::NotFound(_))
        ));
    }

    #[test]
    fn test_timeout_resolver_reports_unavailable() {
        Logger::set_enabled(false);
        let slow = SlowResolver {
            delay: Duration::from_millis(500),
            registry: registry_with(&["depts"]),
        };
        let resolver = TimeoutResolver::new(Arc::new(slow), Duration::from_millis(20));
        let err = resolver.resolve("depts").err().unwrap();
        assert_eq!(
            err,
            CollectionError::Unavailable {
                name: "depts".into(),
                timeout_ms: 20
            }
        );
    }
}
