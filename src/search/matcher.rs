//! Term matching against stored values
//!
//! A string value matches a term when it is equal to it, or when one of its
//! lowercase alphanumeric tokens equals the lowercased term. Numbers and
//! booleans match a term that parses to the same value.

use crate::index::FieldValue;

pub struct TermMatcher;

impl TermMatcher {
    pub fn matches(value: &FieldValue, term: &str) -> bool {
        match value {
            FieldValue::String(s) => s == term || Self::has_token(s, term),
            FieldValue::Int(i) => match term.trim().parse::<i64>() {
                Ok(t) => t == *i,
                Err(_) => term.trim().parse::<f64>().map_or(false, |t| t == *i as f64),
            },
            FieldValue::Float(_) => match (value.as_f64(), term.trim().parse::<f64>()) {
                (Some(v), Ok(t)) => v == t,
                _ => false,
            },
            FieldValue::Bool(b) => term.trim().eq_ignore_ascii_case(if *b { "true" } else { "false" }),
        }
    }

    /// Lowercase alphanumeric runs of `text`
    pub fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    fn has_token(text: &str, term: &str) -> bool {
        let term = term.to_lowercase();
        Self::tokens(text).any(|t| t == term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_string() {
        assert!(TermMatcher::matches(&FieldValue::from_string("MTS"), "MTS"));
        assert!(TermMatcher::matches(&FieldValue::from_string("a-b c"), "a-b c"));
    }

    #[test]
    fn test_token_match() {
        let text = FieldValue::from_string("These guys develop stuff");
        assert!(TermMatcher::matches(&text, "develop"));
        assert!(TermMatcher::matches(&text, "DEVELOP"));
        assert!(!TermMatcher::matches(&text, "dev"));
        assert!(!TermMatcher::matches(&text, "sell"));
    }

    #[test]
    fn test_case_insensitive_single_token() {
        assert!(TermMatcher::matches(&FieldValue::from_string("Dave"), "dave"));
    }

    #[test]
    fn test_numbers_and_bools() {
        assert!(TermMatcher::matches(&FieldValue::from_int(42), "42"));
        assert!(TermMatcher::matches(&FieldValue::from_int(42), "42.0"));
        assert!(!TermMatcher::matches(&FieldValue::from_int(42), "forty-two"));
        assert!(TermMatcher::matches(&FieldValue::from_float(1.5), "1.5"));
        assert!(TermMatcher::matches(&FieldValue::from_bool(true), "TRUE"));
        assert!(!TermMatcher::matches(&FieldValue::from_bool(false), "true"));
    }
}
