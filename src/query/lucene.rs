//! Standard clause parser
//!
//! Whitespace separated clauses, each optionally prefixed with `+`
//! (required) or `-` (prohibited). Unprefixed clauses are optional.

use super::ast::Query;
use super::errors::{QueryError, QueryResult};

/// Parses `text`, resolving bare terms against `default_field`
pub fn parse(text: &str, default_field: Option<&str>) -> QueryResult<Query> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(QueryError::syntax(text, "empty query"));
    }

    let mut must = Vec::new();
    let mut should = Vec::new();
    let mut must_not = Vec::new();

    for token in &tokens {
        let (bucket, clause) = if let Some(rest) = token.strip_prefix('+') {
            (&mut must, rest)
        } else if let Some(rest) = token.strip_prefix('-') {
            (&mut must_not, rest)
        } else {
            (&mut should, token.as_str())
        };
        if clause.is_empty() {
            return Err(QueryError::syntax(text, "operator without clause"));
        }
        bucket.push(parse_clause(text, clause, default_field)?);
    }

    Ok(Query::boolean(must, should, must_not))
}

fn parse_clause(text: &str, clause: &str, default_field: Option<&str>) -> QueryResult<Query> {
    if clause == "*:*" {
        return Ok(Query::MatchAll);
    }

    let field_split = if clause.starts_with('"') {
        None
    } else {
        clause.split_once(':')
    };

    match field_split {
        Some((field, value)) => {
            if field.is_empty() {
                return Err(QueryError::syntax(text, "empty field name"));
            }
            match value {
                "" => Err(QueryError::syntax(
                    text,
                    format!("missing value for field '{}'", field),
                )),
                "*" => Ok(Query::exists(field)),
                value => Ok(Query::term(field, unquote(text, value)?)),
            }
        }
        None => {
            let field = default_field.filter(|f| !f.is_empty()).ok_or_else(|| {
                QueryError::syntax(text, format!("no default field for term '{}'", clause))
            })?;
            Ok(Query::term(field, unquote(text, clause)?))
        }
    }
}

/// Splits on whitespace outside double quotes
fn tokenize(text: &str) -> QueryResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quote = !in_quote;
                current.push(c);
            }
            '\\' if in_quote => {
                current.push(c);
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            c if c.is_whitespace() && !in_quote => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if in_quote {
        return Err(QueryError::syntax(text, "unterminated quote"));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

fn unquote(text: &str, value: &str) -> QueryResult<String> {
    let Some(inner) = value.strip_prefix('"') else {
        return Ok(value.to_string());
    };
    let Some(inner) = inner.strip_suffix('"') else {
        return Err(QueryError::syntax(text, "unterminated quote"));
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}
