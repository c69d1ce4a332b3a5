//! Query parsing for aerosearch
//!
//! Turns request text into a [`Query`] tree:
//! - `{!...}` local parameter blocks choose the parser
//! - `$name` values are looked up in the request parameters
//! - `lucene`, `dismax` and `join` parsers are built in

mod ast;
mod errors;
mod local_params;
mod lucene;
mod params;
mod parser;

pub use ast::Query;
pub use errors::{QueryError, QueryResult};
pub use local_params::LocalParams;
pub use params::RequestParams;
pub use parser::{QueryParser, DISMAX, JOIN, LUCENE};
