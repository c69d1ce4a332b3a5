//! Observability subsystem for aerosearch
//!
//! - Structured logging (JSON lines)
//! - Monotonic counters
//! - Begin/complete scopes around joins and searches
//!
//! Observability is read-only: nothing here influences query results, and a
//! logging failure never fails a query.

mod logger;
mod metrics;
mod scope;

pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;
