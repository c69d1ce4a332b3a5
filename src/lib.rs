//! aerosearch - document search with field-value joins
//!
//! Documents live in named in-memory collections and are queried through
//! immutable snapshots. A query may contain `{!join from=.. to=..}` clauses
//! that select documents sharing a field value with the matches of a
//! sub-query, optionally evaluated in another collection.

pub mod cli;
pub mod collection;
pub mod config;
pub mod errors;
pub mod index;
pub mod join;
pub mod observability;
pub mod query;
pub mod search;
