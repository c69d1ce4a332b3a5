//! Per-join set-size diagnostics
//!
//! Collected while a query evaluates and surfaced verbatim in debug output,
//! keyed by each join's signature. Never affects results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Set sizes for one join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinStats {
    pub from_set_size: usize,
    pub to_set_size: usize,
}

/// Stats for every join evaluated by one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct JoinDiagnostics {
    entries: BTreeMap<String, JoinStats>,
}

impl JoinDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records stats under `signature`. A join evaluated twice keeps its
    /// latest stats.
    pub fn record(&mut self, signature: impl Into<String>, stats: JoinStats) {
        self.entries.insert(signature.into(), stats);
    }

    pub fn get(&self, signature: &str) -> Option<JoinStats> {
        self.entries.get(signature).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, JoinStats)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::Value::Object(Default::default()))
    }
}
