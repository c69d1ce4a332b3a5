//! Shared error severity for aerosearch subsystems
//!
//! Error codes follow the `AERO_CATEGORY_NAME` format. Every subsystem error
//! exposes `code()` and `severity()` so callers can report failures uniformly.

use std::fmt;

/// Severity levels for query-path errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected (bad parameters, unknown names)
    Reject,
    /// Operation failed at runtime; the caller may retry with its own policy
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}
