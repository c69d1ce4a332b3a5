//! Field-value joins for aerosearch
//!
//! A join selects documents in the outer query's collection whose `to` field
//! shares a value with the `from` field of any document matching a
//! sub-query, optionally evaluated in another collection.
//!
//! All set sizes are diagnostic only.

mod budget;
mod diagnostics;
mod errors;
mod executor;
mod result;
mod spec;

pub use budget::{CancelHandle, ExecutionBudget};
pub use diagnostics::{JoinDiagnostics, JoinStats};
pub use errors::{JoinError, JoinResult};
pub use executor::JoinExecutor;
pub use result::JoinOutcome;
pub use spec::JoinSpec;
