//! Inverted value index built at query time
//!
//! Maps every value of one field to the ascending list of documents holding
//! it, over every live document of one snapshot. Building visits each field
//! occurrence once, so cost is O(total occurrences of the field in the
//! collection); this dominates join execution.
//!
//! An index is read-only once built and is tied to the snapshot version it
//! was built from.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::collection::{DocId, SnapshotReader};
use crate::join::{ExecutionBudget, JoinResult};

use super::extractor::ValueExtractor;
use super::value::FieldValue;

/// Documents checked between budget polls when none is configured
pub const DEFAULT_CHECK_INTERVAL: usize = 1024;

/// Value -> documents mapping for one (collection, field, snapshot version)
#[derive(Debug)]
pub struct ValueToDocsIndex {
    collection: String,
    instance: Uuid,
    field: String,
    version: u64,
    tree: BTreeMap<FieldValue, Vec<DocId>>,
}

impl ValueToDocsIndex {
    /// Builds the index over every live document of `reader`.
    ///
    /// A field that no document holds yields an empty index. The budget is
    /// polled every `check_interval` documents; on cancellation the partial
    /// mapping is dropped and the error returned.
    pub fn build(
        reader: &dyn SnapshotReader,
        field: &str,
        budget: &ExecutionBudget,
        check_interval: usize,
    ) -> JoinResult<Self> {
        let interval = check_interval.max(1);
        let mut tree: BTreeMap<FieldValue, Vec<DocId>> = BTreeMap::new();

        for (visited, doc) in reader.live_docs().enumerate() {
            if visited % interval == 0 {
                budget.check()?;
            }
            for value in ValueExtractor::values(reader, doc, field) {
                let docs = tree.entry(value).or_default();
                // live docs arrive ascending; skip repeats of one value in one doc
                if docs.last() != Some(&doc) {
                    docs.push(doc);
                }
            }
        }

        Ok(Self {
            collection: reader.collection().to_string(),
            instance: reader.instance(),
            field: field.to_string(),
            version: reader.version(),
            tree,
        })
    }

    /// Documents holding `value`, ascending; empty when absent
    pub fn lookup(&self, value: &FieldValue) -> &[DocId] {
        self.tree.get(value).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Collection instance the index was built from
    pub fn instance(&self) -> Uuid {
        self.instance
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Snapshot version the index was built from
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns true if the index was built from this exact snapshot
    pub fn matches_snapshot(&self, reader: &dyn SnapshotReader) -> bool {
        self.collection == reader.collection()
            && self.instance == reader.instance()
            && self.version == reader.version()
    }

    /// Number of distinct values
    pub fn key_count(&self) -> usize {
        self.tree.len()
    }

    /// Total (value, document) pairs
    pub fn posting_count(&self) -> usize {
        self.tree.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

}
