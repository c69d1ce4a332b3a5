//! Search request parameters
//!
//! Recognised parameters: `q`, `fq` (repeatable), `sort`, `start`, `rows`,
//! `fl`, `debugQuery` and `defType`. Anything else stays available to query
//! parsers through `$name` references and parser defaults such as `qf`.

use crate::config::SearchConfig;
use crate::query::{RequestParams, LUCENE};

use super::errors::{SearchError, SearchResult};
use super::sorter::{SortDirection, SortSpec};

/// A validated search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    filters: Vec<String>,
    sort: Vec<SortSpec>,
    start: usize,
    rows: usize,
    fields: Option<Vec<String>>,
    debug: bool,
    def_type: String,
}

impl SearchRequest {
    /// Reads and validates the request parameters
    pub fn from_params(params: &RequestParams, config: &SearchConfig) -> SearchResult<Self> {
        let query = params
            .get("q")
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| SearchError::invalid_param("q", "missing query"))?
            .to_string();

        let rows = parse_count(params, "rows", config.default_rows)?;
        if rows > config.max_rows {
            return Err(SearchError::invalid_param(
                "rows",
                format!("must not exceed {}", config.max_rows),
            ));
        }

        Ok(Self {
            query,
            filters: params
                .get_all("fq")
                .iter()
                .filter(|fq| !fq.trim().is_empty())
                .cloned()
                .collect(),
            sort: parse_sort(params.get("sort").unwrap_or(""))?,
            start: parse_count(params, "start", 0)?,
            rows,
            fields: parse_fields(params.get("fl").unwrap_or("*")),
            debug: parse_bool(params, "debugQuery")?,
            def_type: params.get("defType").unwrap_or(LUCENE).to_string(),
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    pub fn sort(&self) -> &[SortSpec] {
        &self.sort
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Fields to return; `None` returns whole documents
    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Parser for `q` when its text names none
    pub fn def_type(&self) -> &str {
        &self.def_type
    }
}

fn parse_count(params: &RequestParams, name: &str, default: usize) -> SearchResult<usize> {
    match params.get(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| SearchError::invalid_param(name, format!("'{}' is not a non-negative integer", raw))),
    }
}

fn parse_bool(params: &RequestParams, name: &str) -> SearchResult<bool> {
    match params.get(name).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "true" | "on" | "yes" => Ok(true),
            "false" | "off" | "no" | "" => Ok(false),
            _ => Err(SearchError::invalid_param(name, format!("'{}' is not a boolean", v))),
        },
    }
}

/// Parses `field dir, field dir`
fn parse_sort(raw: &str) -> SearchResult<Vec<SortSpec>> {
    let mut specs = Vec::new();
    for clause in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let parts: Vec<&str> = clause.split_whitespace().collect();
        let [field, direction] = parts.as_slice() else {
            return Err(SearchError::invalid_param(
                "sort",
                format!("expected 'field asc|desc', got '{}'", clause),
            ));
        };
        let direction = match direction.to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => {
                return Err(SearchError::invalid_param(
                    "sort",
                    format!("unknown direction '{}'", other),
                ))
            }
        };
        specs.push(SortSpec {
            field: field.to_string(),
            direction,
        });
    }
    Ok(specs)
}

fn parse_fields(raw: &str) -> Option<Vec<String>> {
    let fields: Vec<String> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();
    if fields.is_empty() || fields.iter().any(|f| f == "*") {
        None
    } else {
        Some(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(pairs: &[(&str, &str)]) -> SearchResult<SearchRequest> {
        SearchRequest::from_params(
            &RequestParams::from_pairs(pairs.iter().copied()),
            &SearchConfig::default(),
        )
    }

    #[test]
    fn test_defaults() {
        let req = request(&[("q", "*:*")]).unwrap();
        assert_eq!(req.query(), "*:*");
        assert!(req.filters().is_empty());
        assert!(req.sort().is_empty());
        assert_eq!(req.start(), 0);
        assert_eq!(req.rows(), 10);
        assert_eq!(req.fields(), None);
        assert!(!req.debug());
        assert_eq!(req.def_type(), "lucene");
    }

    #[test]
    fn test_all_params() {
        let req = request(&[
            ("q", "dave"),
            ("fq", "name:john"),
            ("fq", "title:VP"),
            ("sort", "id asc, age DESC"),
            ("start", "5"),
            ("rows", "2"),
            ("fl", "id,name"),
            ("debugQuery", "true"),
            ("defType", "dismax"),
        ])
        .unwrap();
        assert_eq!(req.filters(), &["name:john".to_string(), "title:VP".to_string()]);
        assert_eq!(req.sort(), &[SortSpec::asc("id"), SortSpec::desc("age")]);
        assert_eq!(req.start(), 5);
        assert_eq!(req.rows(), 2);
        assert_eq!(req.fields(), Some(&["id".to_string(), "name".to_string()][..]));
        assert!(req.debug());
        assert_eq!(req.def_type(), "dismax");
    }

    #[test]
    fn test_missing_q() {
        let err = request(&[("rows", "1")]).unwrap_err();
        assert_eq!(err, SearchError::invalid_param("q", "missing query"));
    }

    #[test]
    fn test_invalid_values() {
        for (param, value) in [
            ("rows", "ten"),
            ("rows", "-1"),
            ("rows", "5000"),
            ("start", "x"),
            ("sort", "id"),
            ("sort", "id sideways"),
            ("debugQuery", "maybe"),
        ] {
            let err = request(&[("q", "*:*"), (param, value)]).unwrap_err();
            assert!(
                matches!(err, SearchError::InvalidParam { param: ref p, .. } if p == param),
                "{}={}",
                param,
                value
            );
        }
    }
}
