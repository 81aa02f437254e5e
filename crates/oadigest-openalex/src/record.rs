//! Raw records: schema-less JSON objects with path accessors
//!
//! Paths are dot-separated keys. A segment ending in `[]` fans out over an
//! array, so `authorships[].institutions[].display_name` reaches every
//! institution name of every authorship. Absent keys, nulls and shape
//! mismatches never fail; they resolve to [`Node::Missing`] / no values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use oadigest_core::ClientError;

/// One resource instance as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

/// Result of resolving a single path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    /// Some key along the path is absent (or a parent is not an object)
    Missing,
    Null,
    /// String, number or boolean
    Scalar(&'a Value),
    Seq(&'a [Value]),
    Map(&'a Map<String, Value>),
}

impl<'a> Node<'a> {
    fn from_value(value: &'a Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Array(items) => Self::Seq(items),
            Value::Object(map) => Self::Map(map),
            scalar => Self::Scalar(scalar),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_scalar(&self) -> Option<&'a Value> {
        match self {
            Self::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.as_scalar().and_then(Value::as_str)
    }

    pub fn as_map(&self) -> Option<&'a Map<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl RawRecord {
    /// Wrap a JSON value; anything but an object is a decode error
    pub fn from_value(value: Value) -> Result<Self, ClientError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ClientError::Decode(format!(
                "expected a JSON object record, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Resolve a plain dot path (no `[]` segments)
    pub fn get(&self, path: &str) -> Node<'_> {
        let mut segments = path.split('.');
        let Some(first) = segments.next() else {
            return Node::Missing;
        };
        let Some(mut current) = self.0.get(first) else {
            return Node::Missing;
        };
        for segment in segments {
            match current.get(segment) {
                Some(next) => current = next,
                None => return Node::Missing,
            }
        }
        Node::from_value(current)
    }

    /// Collect every non-null scalar reachable through `path`, in document order
    pub fn collect(&self, path: &str) -> Vec<&Value> {
        let segments: Vec<&str> = path.split('.').collect();
        let mut out = Vec::new();
        collect_from_map(&self.0, &segments, &mut out);
        out
    }

    /// Full OpenAlex ID (e.g. "https://openalex.org/W2741809807")
    pub fn id(&self) -> Option<&str> {
        self.get("id").as_str()
    }

    /// Short ID (e.g. "W2741809807")
    pub fn short_id(&self) -> Option<&str> {
        self.id().map(short_id)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.get("display_name").as_str()
    }

    /// Abstract inverted index, when present and non-null
    pub fn abstract_index(&self) -> Option<&Map<String, Value>> {
        self.get("abstract_inverted_index").as_map()
    }
}

impl TryFrom<Value> for RawRecord {
    type Error = ClientError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Extract short ID from full OpenAlex URL ("https://openalex.org/W123" → "W123")
pub fn short_id(id: &str) -> &str {
    id.rsplit('/').next().filter(|s| !s.is_empty()).unwrap_or(id)
}

fn collect_from_map<'a>(map: &'a Map<String, Value>, segments: &[&str], out: &mut Vec<&'a Value>) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };
    let (key, fan_out) = match segment.strip_suffix("[]") {
        Some(key) => (key, true),
        None => (*segment, false),
    };
    let Some(child) = map.get(key) else {
        return;
    };
    match (fan_out, child) {
        (true, Value::Array(items)) => {
            for item in items {
                collect_from_value(item, rest, out);
            }
        }
        (true, _) => {}
        (false, child) => collect_from_value(child, rest, out),
    }
}

fn collect_from_value<'a>(value: &'a Value, segments: &[&str], out: &mut Vec<&'a Value>) {
    if segments.is_empty() {
        if matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_)) {
            out.push(value);
        }
        return;
    }
    if let Value::Object(map) = value {
        collect_from_map(map, segments, out);
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        RawRecord::from_value(value).unwrap()
    }

    #[test]
    fn non_object_rejected() {
        let err = RawRecord::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ClientError::Decode(ref m) if m.contains("array")));
        assert!(RawRecord::try_from(json!("W1")).is_err());
    }

    #[test]
    fn get_nested_scalar() {
        let r = record(json!({"open_access": {"is_oa": true, "oa_status": "gold"}}));
        assert_eq!(r.get("open_access.oa_status").as_str(), Some("gold"));
        assert_eq!(r.get("open_access.is_oa").as_scalar(), Some(&json!(true)));
    }

    #[test]
    fn get_missing_and_null() {
        let r = record(json!({"doi": null, "ids": {"mag": "1"}}));
        assert_eq!(r.get("doi"), Node::Null);
        assert!(r.get("title").is_missing());
        assert!(r.get("ids.pmid").is_missing());
        // descending through a scalar is Missing, not a panic
        assert!(r.get("ids.mag.deeper").is_missing());
    }

    #[test]
    fn get_container_nodes() {
        let r = record(json!({"topics": [], "biblio": {}}));
        assert!(matches!(r.get("topics"), Node::Seq(items) if items.is_empty()));
        assert!(r.get("biblio").as_map().is_some());
    }

    #[test]
    fn collect_fans_out_in_order() {
        let r = record(json!({
            "authorships": [
                {"institutions": [{"display_name": "MIT"}, {"display_name": "CNRS"}]},
                {"institutions": []},
                {"institutions": [{"display_name": "MIT"}]}
            ]
        }));
        let names: Vec<_> = r
            .collect("authorships[].institutions[].display_name")
            .into_iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(names, vec!["MIT", "CNRS", "MIT"]);
    }

    #[test]
    fn collect_scalar_arrays() {
        let r = record(json!({
            "authorships": [{"countries": ["US", "FR"]}, {"countries": ["US"]}, {}]
        }));
        let codes: Vec<_> = r
            .collect("authorships[].countries[]")
            .into_iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(codes, vec!["US", "FR", "US"]);
    }

    #[test]
    fn collect_skips_nulls_and_shape_mismatches() {
        let r = record(json!({
            "authorships": [
                {"author": {"display_name": null}},
                {"author": "not an object"},
                {"author": {"display_name": "Ada"}}
            ],
            "keywords": {"not": "an array"}
        }));
        assert_eq!(r.collect("authorships[].author.display_name"), vec![&json!("Ada")]);
        assert!(r.collect("keywords[].display_name").is_empty());
        assert!(r.collect("missing[].x").is_empty());
    }

    #[test]
    fn ids() {
        let r = record(json!({"id": "https://openalex.org/W2741809807", "display_name": "T"}));
        assert_eq!(r.short_id(), Some("W2741809807"));
        assert_eq!(r.display_name(), Some("T"));
        assert_eq!(short_id("W1"), "W1");
    }

    #[test]
    fn serializes_as_plain_object() {
        let value = json!({"id": "W1", "nested": {"a": [1, 2]}});
        let r = record(value.clone());
        assert_eq!(serde_json::to_value(&r).unwrap(), value);
        assert_eq!(r.into_value(), value);
    }
}
