//! Outer search pipeline
//!
//! `q` and `fq` parameters are parsed, evaluated against one collection
//! snapshot, intersected, sorted and paged into a [`SearchResponse`].

mod engine;
mod errors;
mod evaluator;
mod matcher;
mod request;
mod response;
mod sorter;

pub use engine::SearchEngine;
pub use errors::{SearchError, SearchResult};
pub use evaluator::QueryEvaluator;
pub use matcher::TermMatcher;
pub use request::SearchRequest;
pub use response::{project, DebugInfo, ResultPage, SearchResponse};
pub use sorter::{ResultSorter, SortDirection, SortSpec, DOC_ID_FIELD};
