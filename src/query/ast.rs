//! Parsed query representation
//!
//! Every parser lowers its input into [`Query`]. The `Display` form is the
//! canonical text used to key diagnostics.

use std::fmt;

use crate::join::JoinSpec;

use super::local_params::quote_value;

/// A parsed query clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Every live document
    MatchAll,
    /// No document
    MatchNone,
    /// Documents whose field holds a value matching the term
    Term { field: String, value: String },
    /// Documents holding at least one value in the field
    Exists { field: String },
    /// Required, optional and prohibited clauses
    Boolean {
        must: Vec<Query>,
        should: Vec<Query>,
        must_not: Vec<Query>,
    },
    /// Every term must match at least one of the fields
    DisMax { fields: Vec<String>, terms: Vec<String> },
    /// Documents reachable through a field-value join
    Join(Box<JoinSpec>),
}

impl Query {
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        Query::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Query::Exists {
            field: field.into(),
        }
    }

    pub fn join(spec: JoinSpec) -> Self {
        Query::Join(Box::new(spec))
    }

    /// Builds a boolean query, collapsing the single required or single
    /// optional clause case to the clause itself.
    pub fn boolean(must: Vec<Query>, should: Vec<Query>, must_not: Vec<Query>) -> Self {
        match (must.len(), should.len(), must_not.len()) {
            (0, 0, 0) => Query::MatchAll,
            (1, 0, 0) => must.into_iter().next().unwrap_or(Query::MatchAll),
            (0, 1, 0) => should.into_iter().next().unwrap_or(Query::MatchAll),
            _ => Query::Boolean {
                must,
                should,
                must_not,
            },
        }
    }
}

fn fmt_value(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '"') {
        write!(f, "\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        write!(f, "{}", value)
    }
}

fn fmt_nested(f: &mut fmt::Formatter<'_>, query: &Query) -> fmt::Result {
    match query {
        Query::Boolean { .. } => write!(f, "({})", query),
        _ => write!(f, "{}", query),
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::MatchAll => write!(f, "*:*"),
            Query::MatchNone => write!(f, "-*:*"),
            Query::Term { field, value } => {
                write!(f, "{}:", field)?;
                fmt_value(f, value)
            }
            Query::Exists { field } => write!(f, "{}:*", field),
            Query::Boolean {
                must,
                should,
                must_not,
            } => {
                let mut first = true;
                let clauses = must
                    .iter()
                    .map(|q| ("+", q))
                    .chain(should.iter().map(|q| ("", q)))
                    .chain(must_not.iter().map(|q| ("-", q)));
                for (prefix, clause) in clauses {
                    if !first {
                        write!(f, " ")?;
                    }
                    first = false;
                    write!(f, "{}", prefix)?;
                    fmt_nested(f, clause)?;
                }
                Ok(())
            }
            Query::DisMax { fields, terms } => {
                write!(f, "{{!dismax qf={}}}{}", quote_value(&fields.join(" ")), terms.join(" "))
            }
            Query::Join(spec) => write!(f, "{}", spec.signature()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_collapses_single_clause() {
        let q = Query::boolean(vec![Query::term("name", "john")], vec![], vec![]);
        assert_eq!(q, Query::term("name", "john"));

        let q = Query::boolean(vec![], vec![], vec![]);
        assert_eq!(q, Query::MatchAll);
    }

    #[test]
    fn test_boolean_keeps_prohibited() {
        let q = Query::boolean(vec![], vec![], vec![Query::term("name", "john")]);
        assert!(matches!(q, Query::Boolean { .. }));
        assert_eq!(q.to_string(), "-name:john");
    }

    #[test]
    fn test_display() {
        assert_eq!(Query::MatchAll.to_string(), "*:*");
        assert_eq!(Query::term("title", "MTS").to_string(), "title:MTS");
        assert_eq!(Query::term("title", "a b").to_string(), "title:\"a b\"");
        assert_eq!(Query::exists("dept_s").to_string(), "dept_s:*");

        let q = Query::boolean(
            vec![Query::term("a", "1")],
            vec![Query::term("b", "2")],
            vec![Query::term("c", "3")],
        );
        assert_eq!(q.to_string(), "+a:1 b:2 -c:3");

        let q = Query::DisMax {
            fields: vec!["name".into(), "title".into()],
            terms: vec!["dave".into()],
        };
        assert_eq!(q.to_string(), "{!dismax qf='name title'}dave");
    }
}
