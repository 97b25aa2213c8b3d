//! Dynamic value universe for validated instances.
//!
//! Model fields are dynamically typed: a property may hold a scalar, an
//! ordered collection, a plain map, or another schema-bound model instance.
//! Validators consume [`Value`]s; `from_json`/`to_json` bridge to
//! `serde_json::Value` at the crate boundary.

use std::collections::HashMap;
use std::fmt;

use crate::instance::Instance;

/// A dynamically typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent or explicitly null.
    Null,
    /// Boolean. `false` is a value, not an absence.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered, possibly heterogeneous collection.
    Array(Vec<Value>),
    /// A plain map carrying no schema identity.
    Object(HashMap<String, Value>),
    /// A model instance bound to a schema.
    Model(Instance),
}

impl Value {
    /// Returns the type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Model(_) => "model",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for values a presence check rejects: null and the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(text) => text.is_empty(),
            _ => false,
        }
    }

    /// Converts a JSON value. Integers stay integral; JSON objects become
    /// plain [`Value::Object`] maps (never model instances).
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(flag) => Value::Bool(*flag),
            serde_json::Value::Number(number) => number
                .as_i64()
                .map(Value::Int)
                .or_else(|| number.as_f64().map(Value::Float))
                .unwrap_or(Value::Null),
            serde_json::Value::String(text) => Value::String(text.clone()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), Value::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// Converts to a JSON value. Model instances serialize through
    /// [`Instance::to_json`]; non-finite floats degrade to null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(flag) => serde_json::Value::Bool(*flag),
            Value::Int(number) => serde_json::Value::from(*number),
            Value::Float(number) => serde_json::Number::from_f64(*number)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(text) => serde_json::Value::String(text.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Model(instance) => instance.to_json(),
        }
    }
}

/// The display string consumed by stringifying validators (format, integer,
/// email). Null renders empty, collections comma-join their elements.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(flag) => write!(f, "{}", flag),
            Value::Int(number) => write!(f, "{}", number),
            Value::Float(number) => write!(f, "{}", number),
            Value::String(text) => f.write_str(text),
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object]"),
            Value::Model(instance) => write!(f, "{}", instance),
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Value::Int(i64::from(number))
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Int(number)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Float(number)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::String(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::String(text)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Model(instance)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blankness() {
        assert!(Value::Null.is_blank());
        assert!(Value::String(String::new()).is_blank());
        assert!(!Value::String("x".into()).is_blank());
        // false is a value, not an absence
        assert!(!Value::Bool(false).is_blank());
        assert!(!Value::Int(0).is_blank());
    }

    #[test]
    fn test_from_json_preserves_integers() {
        assert_eq!(Value::from_json(&json!(42)), Value::Int(42));
        assert_eq!(Value::from_json(&json!(1.5)), Value::Float(1.5));
        assert_eq!(Value::from_json(&json!(null)), Value::Null);
    }

    #[test]
    fn test_json_round_trip() {
        let json = json!({
            "name": "Leftorium",
            "founded": 1991,
            "solvent": true,
            "tags": ["retail", "left-handed"]
        });
        assert_eq!(Value::from_json(&json).to_json(), json);
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(Value::Int(123).to_string(), "123");
        assert_eq!(Value::Float(12.5).to_string(), "12.5");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(
            Value::from(vec![Value::Int(1), Value::Int(2)]).to_string(),
            "1,2"
        );
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::from(1).type_name(), "int");
        assert_eq!(Value::from(1.0).type_name(), "float");
        assert_eq!(Value::Object(HashMap::new()).type_name(), "object");
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::String("x".into()));
    }
}
