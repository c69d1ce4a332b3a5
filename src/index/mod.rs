//! Index subsystem for aerosearch
//!
//! Indexes here are derived, in-memory state built per query from a
//! snapshot. They are never the source of truth and never persisted.
//!
//! # Components
//!
//! - `FieldValue`: tagged scalar that keys every index
//! - `ValueExtractor`: reads zero, one or many values of a field
//! - `ValueToDocsIndex`: value -> documents over a whole snapshot
//! - `IndexCache`: optional reuse of built indexes for the same snapshot

mod cache;
mod extractor;
mod inverted;
mod value;

pub use cache::{CacheStats, IndexCache, IndexCacheKey};
pub use extractor::ValueExtractor;
pub use inverted::{ValueToDocsIndex, DEFAULT_CHECK_INTERVAL};
pub use value::FieldValue;
