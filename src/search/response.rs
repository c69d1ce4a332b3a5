//! Search response
//!
//! Serializes as
//! `{"response":{"numFound":n,"start":s,"docs":[...]},"debug":{...}}` with
//! `debug` present only for debug requests.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::join::JoinDiagnostics;

/// Result of one search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub response: ResultPage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

/// One page of matching documents
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    pub num_found: usize,
    pub start: usize,
    pub docs: Vec<Value>,
}

/// Debug output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    /// Join set sizes keyed by join signature
    pub join: JoinDiagnostics,
    pub parsed_query: String,
    pub parsed_filter_queries: Vec<String>,
}

impl SearchResponse {
    pub fn num_found(&self) -> usize {
        self.response.num_found
    }

    /// `id` of each returned document, in response order
    pub fn ids(&self) -> Vec<String> {
        self.response
            .docs
            .iter()
            .filter_map(|doc| match doc.get("id")? {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect()
    }

    pub fn join_diagnostics(&self) -> Option<&JoinDiagnostics> {
        self.debug.as_ref().map(|debug| &debug.join)
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Keeps only `fields` of a document body
pub fn project(body: &Value, fields: Option<&[String]>) -> Value {
    let Some(fields) = fields else {
        return body.clone();
    };
    let mut out = Map::new();
    for field in fields {
        if let Some(value) = body.get(field) {
            out.insert(field.clone(), value.clone());
        }
    }
    Value::Object(out)
}
