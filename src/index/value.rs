//! Field values as stored in documents
//!
//! A `FieldValue` is a tagged scalar with value-based equality, ordering and
//! hashing, so it can key both ordered maps and hash sets.

use std::fmt;

use serde_json::Value;

/// One stored occurrence of a field.
///
/// Ordering is deterministic: Bool < Int < Float < String. Integers and
/// floats are distinct kinds, so `1` never equals `1.0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldValue {
    /// Boolean value (false < true)
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value, stored as order-preserving bits
    Float(u64),
    /// String value
    String(String),
}

impl FieldValue {
    pub fn from_bool(v: bool) -> Self {
        FieldValue::Bool(v)
    }

    pub fn from_int(v: i64) -> Self {
        FieldValue::Int(v)
    }

    /// Create a value from a float.
    ///
    /// Uses a bit encoding whose unsigned order matches numeric order.
    /// `-0.0` is stored as `0.0` so equal numbers share one key.
    pub fn from_float(v: f64) -> Self {
        let v = if v == 0.0 { 0.0 } else { v };
        let bits = v.to_bits();
        let ordered = if (bits >> 63) == 1 {
            !bits
        } else {
            bits ^ (1 << 63)
        };
        FieldValue::Float(ordered)
    }

    pub fn from_string(v: impl Into<String>) -> Self {
        FieldValue::String(v.into())
    }

    /// Create a value from a JSON scalar.
    ///
    /// Null, arrays and objects have no single value and return `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(FieldValue::from_bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(FieldValue::from_int(i))
                } else {
                    n.as_f64().map(FieldValue::from_float)
                }
            }
            Value::String(s) => Some(FieldValue::from_string(s.as_str())),
            _ => None,
        }
    }

    /// Decodes a float value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(ordered) => {
                let bits = if (ordered >> 63) == 1 {
                    ordered ^ (1 << 63)
                } else {
                    !ordered
                };
                Some(f64::from_bits(bits))
            }
            _ => None,
        }
    }

    /// Converts back to a JSON scalar
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Float(_) => self.as_f64().map(Value::from).unwrap_or(Value::Null),
            FieldValue::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(_) => write!(f, "{}", self.as_f64().unwrap_or(f64::NAN)),
            FieldValue::String(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_ordering() {
        let values = vec![
            FieldValue::from_bool(false),
            FieldValue::from_bool(true),
            FieldValue::from_int(-100),
            FieldValue::from_int(100),
            FieldValue::from_float(-2.5),
            FieldValue::from_float(0.0),
            FieldValue::from_float(3.25),
            FieldValue::from_string("Engineering"),
            FieldValue::from_string("Sales"),
        ];
        for i in 1..values.len() {
            assert!(values[i - 1] < values[i], "{:?} < {:?}", values[i - 1], values[i]);
        }
    }

    #[test]
    fn test_float_round_trip() {
        for f in [-1e10, -0.5, 0.0, 1.5, 42.0] {
            assert_eq!(FieldValue::from_float(f).as_f64(), Some(f));
        }
    }

    #[test]
    fn test_signed_zero_is_one_value() {
        assert_eq!(FieldValue::from_float(-0.0), FieldValue::from_float(0.0));
        assert_eq!(
            FieldValue::from_json(&json!(-0.0)),
            FieldValue::from_json(&json!(0.0))
        );
        assert!(FieldValue::from_float(-0.0) > FieldValue::from_float(-1e-300));
    }

    #[test]
    fn test_int_and_float_are_distinct() {
        assert_ne!(
            FieldValue::from_json(&json!(1)),
            FieldValue::from_json(&json!(1.0))
        );
    }

    #[test]
    fn test_from_json_scalars_only() {
        assert_eq!(
            FieldValue::from_json(&json!("Sales")),
            Some(FieldValue::String("Sales".into()))
        );
        assert_eq!(FieldValue::from_json(&json!(7)), Some(FieldValue::Int(7)));
        assert_eq!(FieldValue::from_json(&json!(null)), None);
        assert_eq!(FieldValue::from_json(&json!(["a"])), None);
        assert_eq!(FieldValue::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn test_display_and_json() {
        assert_eq!(FieldValue::from_string("MTS").to_string(), "MTS");
        assert_eq!(FieldValue::from_int(3).to_json(), json!(3));
        assert_eq!(FieldValue::from_float(0.5).to_json(), json!(0.5));
    }
}
