//! Collection subsystem for aerosearch
//!
//! Collections hold JSON documents and publish immutable snapshots. Queries
//! read through [`SnapshotReader`] and find other collections through an
//! injected [`CollectionResolver`].
//!
//! # Invariants
//!
//! - A published snapshot never changes
//! - Document ids are ordinals scoped to one snapshot
//! - Live document ids are visited in ascending order

mod errors;
mod resolver;
mod snapshot;
mod store;

pub use errors::{CollectionError, CollectionResult};
pub use resolver::{CollectionRegistry, CollectionResolver, TimeoutResolver};
pub use snapshot::{unique_key, DocId, DocSet, SharedSnapshot, Snapshot, SnapshotReader};
pub use store::Collection;
