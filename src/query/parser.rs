//! Parser dispatch
//!
//! Picks the parser named by a clause's local parameters, or the caller's
//! default, and resolves `$name` references against the request.

use crate::join::JoinSpec;

use super::ast::Query;
use super::errors::{QueryError, QueryResult};
use super::local_params::LocalParams;
use super::lucene;
use super::params::RequestParams;

/// Standard clause parser
pub const LUCENE: &str = "lucene";
/// All-terms-in-any-field parser
pub const DISMAX: &str = "dismax";
/// Field-value join
pub const JOIN: &str = "join";

/// Joins nested deeper than this are rejected. Stops a `v=$name` reference
/// that points back at its own parameter.
const MAX_NESTING: usize = 8;

/// Parses query text in the context of one request
pub struct QueryParser<'a> {
    request: &'a RequestParams,
}

impl<'a> QueryParser<'a> {
    pub fn new(request: &'a RequestParams) -> Self {
        Self { request }
    }

    /// Parses `text` with the parser its local parameters name, falling
    /// back to `default_type`.
    pub fn parse(&self, text: &str, default_type: &str) -> QueryResult<Query> {
        self.parse_nested(text, default_type, 0)
    }

    fn parse_nested(&self, text: &str, default_type: &str, depth: usize) -> QueryResult<Query> {
        if depth > MAX_NESTING {
            return Err(QueryError::configuration(
                "v",
                format!("query nesting exceeds {} levels", MAX_NESTING),
            ));
        }

        let (local, body) = LocalParams::parse(text)?;
        let local = match local {
            Some(local) => local.dereference(self.request)?,
            None => LocalParams::default(),
        };

        match local.kind().unwrap_or(default_type) {
            LUCENE => {
                let body = local.get("v").unwrap_or(body);
                lucene::parse(body, self.default_field(&local))
            }
            DISMAX => {
                let body = local.get("v").unwrap_or(body);
                self.parse_dismax(body, &local)
            }
            JOIN => self.parse_join(body, &local, depth),
            other => Err(QueryError::configuration(
                "type",
                format!("unknown query parser '{}'", other),
            )),
        }
    }

    fn default_field<'b>(&'b self, local: &'b LocalParams) -> Option<&'b str> {
        local.get("df").or_else(|| self.request.get("df"))
    }

    fn parse_dismax(&self, body: &str, local: &LocalParams) -> QueryResult<Query> {
        let qf = local
            .get("qf")
            .or_else(|| self.request.get("qf"))
            .or_else(|| self.default_field(local))
            .unwrap_or("");

        // Boosts are accepted and ignored
        let fields: Vec<String> = qf
            .split_whitespace()
            .filter_map(|f| f.split('^').next())
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        if fields.is_empty() {
            return Err(QueryError::configuration("qf", "no query fields for dismax"));
        }

        let terms: Vec<String> = body
            .split_whitespace()
            .map(|t| t.trim_matches('"'))
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if terms.is_empty() {
            return Ok(Query::MatchNone);
        }

        Ok(Query::DisMax { fields, terms })
    }

    fn parse_join(&self, body: &str, local: &LocalParams, depth: usize) -> QueryResult<Query> {
        let from = required(local, "from")?;
        let to = required(local, "to")?;
        let from_collection = local
            .get("fromIndex")
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let sub_text = local.get("v").unwrap_or(body);
        let sub_type = local.get("defType").unwrap_or(LUCENE);
        let sub_query = self.parse_nested(sub_text, sub_type, depth + 1)?;

        Ok(Query::join(JoinSpec::new(from, to, from_collection, sub_query)?))
    }
}

fn required<'b>(local: &'b LocalParams, key: &str) -> QueryResult<&'b str> {
    match local.get(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(QueryError::configuration(
            key,
            "required join parameter is missing",
        )),
    }
}
