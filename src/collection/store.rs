//! In-memory document collection
//!
//! Every mutation publishes a new immutable [`Snapshot`]. Readers hold an
//! `Arc` to the snapshot they started with, so concurrent writes never alter
//! a view that has already been handed out.

use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use super::errors::{CollectionError, CollectionResult};
use super::snapshot::{unique_key, Snapshot, SnapshotReader};

/// A named, mutable set of JSON documents keyed by their `id` field
#[derive(Debug)]
pub struct Collection {
    name: String,
    current: RwLock<Arc<Snapshot>>,
}

impl Collection {
    /// Creates an empty collection
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            current: RwLock::new(Arc::new(Snapshot::empty(name.clone()))),
            name,
        }
    }

    /// Returns the collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds or replaces a single document
    pub fn add(&self, body: Value) -> CollectionResult<()> {
        self.add_all(vec![body])
    }

    /// Adds or replaces a batch of documents, publishing one new snapshot.
    ///
    /// The batch is validated up front; on error nothing is published.
    pub fn add_all(&self, bodies: Vec<Value>) -> CollectionResult<()> {
        let mut entries = Vec::with_capacity(bodies.len());
        for body in bodies {
            if !body.is_object() {
                return Err(CollectionError::InvalidDocument(format!(
                    "document in '{}' must be a JSON object",
                    self.name
                )));
            }
            let key = unique_key(&body).ok_or_else(|| {
                CollectionError::InvalidDocument(format!(
                    "document in '{}' is missing a scalar 'id' field",
                    self.name
                ))
            })?;
            entries.push((key, body));
        }

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = current.with_documents(entries);
        *current = Arc::new(next);
        Ok(())
    }

    /// Deletes the document with the given key.
    ///
    /// Returns false if no live document has that key.
    pub fn delete(&self, key: &str) -> bool {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        match current.without_document(key) {
            Some(next) => {
                *current = Arc::new(next);
                true
            }
            None => false,
        }
    }

    /// Returns the current snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    /// Number of live documents
    pub fn len(&self) -> usize {
        self.snapshot().num_docs()
    }

    /// Returns true if there are no live documents
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_publishes_new_version() {
        let collection = Collection::new("people");
        let before = collection.snapshot();

        collection.add(json!({"id": "1", "name": "john"})).unwrap();
        let after = collection.snapshot();

        assert_eq!(before.version() + 1, after.version());
        assert_eq!(before.num_docs(), 0);
        assert_eq!(after.num_docs(), 1);
    }

    #[test]
    fn test_snapshot_unaffected_by_later_writes() {
        let collection = Collection::new("people");
        collection.add(json!({"id": "1", "name": "john"})).unwrap();
        let held = collection.snapshot();

        collection.add(json!({"id": "1", "name": "johnny"})).unwrap();
        collection.delete("1");

        let doc = held.doc_id_of("1").unwrap();
        assert_eq!(held.document(doc).unwrap()["name"], json!("john"));
        assert!(collection.is_empty());
    }

    #[test]
    fn test_rejects_document_without_id() {
        let collection = Collection::new("people");
        let err = collection
            .add_all(vec![json!({"id": "1"}), json!({"name": "no id"})])
            .unwrap_err();

        assert_eq!(err.code(), "AERO_DOCUMENT_INVALID");
        // batch is all-or-nothing
        assert!(collection.is_empty());
    }

    #[test]
    fn test_rejects_non_object() {
        let collection = Collection::new("people");
        assert!(collection.add(json!([1, 2])).is_err());
    }

    #[test]
    fn test_delete_unknown_key() {
        let collection = Collection::new("people");
        let version = collection.snapshot().version();
        assert!(!collection.delete("missing"));
        assert_eq!(collection.snapshot().version(), version);
    }
}
