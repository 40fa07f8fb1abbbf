use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::value_type::ValueType;

/// Ordered mapping of port names to values
pub type ValueMap = IndexMap<String, Value>;

/// A value supplied to, or produced by, a port
///
/// Values are plain JSON-shaped data. Nested maps line up with nested
/// port namespaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(ValueMap),
}

impl Value {
    /// Get the type tag of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Str(_) => ValueType::Str,
            Value::List(_) => ValueType::List,
            Value::Map(_) => ValueType::Map,
        }
    }

    /// Check if this value is a nested mapping
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Get as a nested mapping
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            other => {
                let rendered = serde_json::to_string(other).map_err(|_| fmt::Error)?;
                write!(f, "{}", rendered)
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Map(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                // u64 beyond i64::MAX degrades to a float like any other non-integer
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Build a value map from a JSON object
///
/// Anything other than an object yields an empty map.
pub fn value_map(json: serde_json::Value) -> ValueMap {
    match Value::from(json) {
        Value::Map(map) => map,
        _ => ValueMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_type_tags() {
        assert_eq!(Value::from(5).value_type(), ValueType::Int);
        assert_eq!(Value::from(5.5).value_type(), ValueType::Float);
        assert_eq!(Value::from("x").value_type(), ValueType::Str);
        assert_eq!(Value::Null.value_type(), ValueType::Null);
        assert_eq!(Value::from(vec![Value::from(true)]).value_type(), ValueType::List);
    }

    #[test]
    fn test_from_json_keeps_integers_and_order() {
        let map = value_map(json!({"b": 1, "a": {"c": 2.5, "d": null}}));
        let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(map["b"], Value::Int(1));

        let nested = map["a"].as_map().unwrap();
        assert_eq!(nested["c"], Value::Float(2.5));
        assert_eq!(nested["d"], Value::Null);
    }

    #[test]
    fn test_serde_roundtrip_shape() {
        let value = Value::from(json!({"n": 5, "tags": ["a", "b"], "flag": false}));
        let rendered = serde_json::to_value(&value).unwrap();
        assert_eq!(rendered, json!({"n": 5, "tags": ["a", "b"], "flag": false}));

        let parsed: Value = serde_json::from_str("{\"x\": 1}").unwrap();
        assert_eq!(parsed.as_map().unwrap()["x"], Value::Int(1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("plain").to_string(), "plain");
        assert_eq!(Value::from(3).to_string(), "3");
        assert_eq!(Value::from(json!([1, "a"])).to_string(), "[1,\"a\"]");
    }

    #[test]
    fn test_value_map_of_non_object_is_empty() {
        assert!(value_map(json!(3)).is_empty());
    }
}
