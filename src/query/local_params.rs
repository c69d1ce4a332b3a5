//! Local parameter blocks
//!
//! A query clause may start with `{!type key=value ...}` to pick its parser
//! and set parser options. Values are bare words or `'single'` / `"double"`
//! quoted strings with backslash escapes. A value written `$name` refers to
//! the request parameter `name`.

use std::iter::Peekable;
use std::str::CharIndices;

use super::errors::{QueryError, QueryResult};
use super::params::RequestParams;

type Cursor<'a> = Peekable<CharIndices<'a>>;

/// Parameter name holding the block's parser type
const TYPE_KEY: &str = "type";

/// Parsed `{!...}` block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalParams {
    kind: Option<String>,
    entries: Vec<(String, String)>,
}

impl LocalParams {
    /// Splits a leading local parameter block from `text`.
    ///
    /// Returns `None` and the untouched text when there is no block,
    /// otherwise the parsed block and the text following its closing `}`.
    pub fn parse(text: &str) -> QueryResult<(Option<LocalParams>, &str)> {
        let Some(rest) = text.trim_start().strip_prefix("{!") else {
            return Ok((None, text));
        };

        let mut params = LocalParams::default();
        let mut cursor = rest.char_indices().peekable();

        loop {
            skip_whitespace(&mut cursor);
            let Some(&(pos, c)) = cursor.peek() else {
                return Err(QueryError::configuration(
                    "localParams",
                    "unterminated local parameter block",
                ));
            };
            if c == '}' {
                return Ok((Some(params), &rest[pos + 1..]));
            }

            let key = read_bare(&mut cursor, |c| c == '=');
            if let Some(&(_, '=')) = cursor.peek() {
                cursor.next();
                if key.is_empty() {
                    return Err(QueryError::configuration("localParams", "empty parameter name"));
                }
                let value = read_value(&mut cursor, &key)?;
                if key == TYPE_KEY {
                    params.kind = Some(value);
                } else {
                    params.entries.push((key, value));
                }
            } else if params.kind.is_none() && params.entries.is_empty() {
                params.kind = Some(key);
            } else {
                return Err(QueryError::configuration(key, "expected key=value"));
            }
        }
    }

    /// Parser type named by the block
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces every `$name` value with the request parameter `name`.
    ///
    /// Only one level is resolved; the substituted text is not re-scanned
    /// for further references here.
    pub fn dereference(&self, request: &RequestParams) -> QueryResult<LocalParams> {
        let mut resolved = self.clone();
        for (_, value) in resolved.entries.iter_mut() {
            if let Some(name) = value.strip_prefix('$') {
                let target = request
                    .get(name)
                    .ok_or_else(|| QueryError::UnresolvedParameter(name.to_string()))?;
                *value = target.to_string();
            }
        }
        Ok(resolved)
    }
}

fn skip_whitespace(cursor: &mut Cursor<'_>) {
    while let Some(&(_, c)) = cursor.peek() {
        if !c.is_whitespace() {
            break;
        }
        cursor.next();
    }
}

/// Reads until whitespace, `}` or `stop`
fn read_bare(cursor: &mut Cursor<'_>, stop: impl Fn(char) -> bool) -> String {
    let mut out = String::new();
    while let Some(&(_, c)) = cursor.peek() {
        if c.is_whitespace() || c == '}' || stop(c) {
            break;
        }
        out.push(c);
        cursor.next();
    }
    out
}

fn read_value(cursor: &mut Cursor<'_>, key: &str) -> QueryResult<String> {
    let quote = match cursor.peek() {
        Some(&(_, q)) if q == '\'' || q == '"' => q,
        _ => return Ok(read_bare(cursor, |_| false)),
    };
    cursor.next();

    let mut out = String::new();
    while let Some((_, c)) = cursor.next() {
        match c {
            '\\' => match cursor.next() {
                Some((_, escaped)) => out.push(escaped),
                None => break,
            },
            c if c == quote => return Ok(out),
            c => out.push(c),
        }
    }
    Err(QueryError::configuration(key, "unterminated quoted value"))
}

/// Renders a value so that [`LocalParams::parse`] reads it back unchanged
pub(crate) fn quote_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '}' | '\'' | '"' | '\\' | '='));
    if !needs_quotes {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}
