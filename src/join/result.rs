//! Join output

use crate::collection::DocSet;

use super::diagnostics::JoinStats;

/// Documents produced by one join plus its set-size counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Matching documents in the to-collection
    pub docs: DocSet,
    /// Distinct from-field values across the sub-query's matches
    pub from_set_size: usize,
    /// Distinct from-field values that hit at least one to-document
    pub to_set_size: usize,
}

impl JoinOutcome {
    pub fn stats(&self) -> JoinStats {
        JoinStats {
            from_set_size: self.from_set_size,
            to_set_size: self.to_set_size,
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
