//! Flat scalar values, the cell type of digested records and export sinks

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single scalar cell. Never a list or a mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlatValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Field name → scalar, sorted by key so serialization is deterministic
pub type FlatRecord = BTreeMap<String, FlatValue>;

impl FlatValue {
    /// Convert a JSON scalar. Returns `None` for null, arrays and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FlatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FlatValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FlatValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FlatValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<bool> for FlatValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_scalars() {
        assert_eq!(FlatValue::from_json(&json!(true)), Some(FlatValue::Bool(true)));
        assert_eq!(FlatValue::from_json(&json!(42)), Some(FlatValue::Int(42)));
        assert_eq!(FlatValue::from_json(&json!(0.5)), Some(FlatValue::Float(0.5)));
        assert_eq!(FlatValue::from_json(&json!("x")), Some("x".into()));
    }

    #[test]
    fn from_json_rejects_non_scalars() {
        assert_eq!(FlatValue::from_json(&json!(null)), None);
        assert_eq!(FlatValue::from_json(&json!([1, 2])), None);
        assert_eq!(FlatValue::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn display() {
        assert_eq!(FlatValue::Int(7).to_string(), "7");
        assert_eq!(FlatValue::Bool(false).to_string(), "false");
        assert_eq!(FlatValue::from("gold").to_string(), "gold");
    }

    #[test]
    fn serializes_untagged() {
        let mut record = FlatRecord::new();
        record.insert("b".into(), FlatValue::Int(2));
        record.insert("a".into(), "x".into());
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"a":"x","b":2}"#);
    }
}
