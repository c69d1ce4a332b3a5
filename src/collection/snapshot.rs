//! Immutable point-in-time views of a collection
//!
//! A snapshot never changes after it is published. Document ids are ordinals
//! into the snapshot and are only meaningful for the snapshot they came from.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

/// Snapshot-scoped document identifier
pub type DocId = u32;

/// Ordered set of document ids
pub type DocSet = BTreeSet<DocId>;

/// Shared handle to a searchable snapshot
pub type SharedSnapshot = Arc<dyn SnapshotReader>;

/// Read access to a searchable collection snapshot.
///
/// Implementations must be immutable for their whole lifetime: every call
/// observes the same documents.
pub trait SnapshotReader: Send + Sync {
    /// Name of the collection this snapshot belongs to
    fn collection(&self) -> &str;

    /// Identity of the collection instance that published the snapshot.
    ///
    /// Two collections with the same name never share an instance, so
    /// (instance, version) names exactly one snapshot.
    fn instance(&self) -> Uuid;

    /// Monotonic version of the snapshot within its collection
    fn version(&self) -> u64;

    /// One past the highest document id in the snapshot
    fn max_doc(&self) -> DocId;

    /// Body of a live document, `None` for deleted or out-of-range ids
    fn document(&self, doc: DocId) -> Option<&Value>;

    /// Live document ids in ascending order
    fn live_docs(&self) -> Box<dyn Iterator<Item = DocId> + '_> {
        Box::new((0..self.max_doc()).filter(move |doc| self.document(*doc).is_some()))
    }

    /// Number of live documents
    fn num_docs(&self) -> usize {
        self.live_docs().count()
    }
}

/// Snapshot of an in-memory [`Collection`](super::Collection).
///
/// Document bodies are shared with later snapshots through `Arc`, so
/// publishing a new version never copies or mutates an existing body.
#[derive(Debug, Clone)]
pub struct Snapshot {
    collection: String,
    instance: Uuid,
    version: u64,
    /// Slot per document id; `None` marks a tombstone
    docs: Vec<Option<Arc<Value>>>,
    /// Unique key -> live document id
    keys: HashMap<String, DocId>,
}

impl Snapshot {
    /// Creates an empty snapshot at version 0 for a new collection instance
    pub fn empty(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            instance: Uuid::new_v4(),
            version: 0,
            docs: Vec::new(),
            keys: HashMap::new(),
        }
    }

    /// Returns the live document id for a unique key
    pub fn doc_id_of(&self, key: &str) -> Option<DocId> {
        self.keys.get(key).copied()
    }

    /// Derives the next version with `bodies` appended.
    ///
    /// A body whose key is already live replaces the older document, which
    /// becomes a tombstone.
    pub(super) fn with_documents(&self, bodies: Vec<(String, Value)>) -> Self {
        let mut next = self.clone();
        next.version += 1;
        for (key, body) in bodies {
            if let Some(old) = next.keys.get(&key).copied() {
                next.docs[old as usize] = None;
            }
            let doc = next.docs.len() as DocId;
            next.docs.push(Some(Arc::new(body)));
            next.keys.insert(key, doc);
        }
        next
    }

    /// Derives the next version with the document for `key` tombstoned
    pub(super) fn without_document(&self, key: &str) -> Option<Self> {
        let doc = self.doc_id_of(key)?;
        let mut next = self.clone();
        next.version += 1;
        next.docs[doc as usize] = None;
        next.keys.remove(key);
        Some(next)
    }
}

impl SnapshotReader for Snapshot {
    fn collection(&self) -> &str {
        &self.collection
    }

    fn instance(&self) -> Uuid {
        self.instance
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn max_doc(&self) -> DocId {
        self.docs.len() as DocId
    }

    fn document(&self, doc: DocId) -> Option<&Value> {
        self.docs.get(doc as usize)?.as_deref()
    }

    fn num_docs(&self) -> usize {
        self.keys.len()
    }
}

/// Extracts the unique key (`id`) of a document body.
///
/// Strings are used verbatim, numbers and booleans by their JSON text.
pub fn unique_key(body: &Value) -> Option<String> {
    match body.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
