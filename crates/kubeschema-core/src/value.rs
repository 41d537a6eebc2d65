//! Typed configuration values and the dynamic manifest representation.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::ShapeMismatchError;
use crate::types::ScalarType;

/// A manifest: the server-native nested mapping, keyed in camelCase.
pub type Manifest = serde_json::Map<String, Value>;

/// Attributes of a typed object, keyed by schema attribute name.
pub type TypedObject = BTreeMap<String, TypedValue>;

/// A value conforming to a derived attribute schema.
///
/// Unset values, empty strings, empty collections and objects with no set
/// attribute are all `Null` in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Null,
    Bool(bool),
    String(String),
    Number(f64),
    Integer(i64),
    List(Vec<TypedValue>),
    Map(BTreeMap<String, TypedValue>),
    Object(TypedObject),
}

impl TypedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&TypedObject> {
        match self {
            TypedValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Attribute of an object value; unwraps the one-element metadata list.
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        match self {
            TypedValue::Object(o) => o.get(name),
            TypedValue::List(items) if items.len() == 1 => items[0].get(name),
            _ => None,
        }
    }

    /// Wrap an object in a one-element list (the typed metadata form).
    pub fn wrap(self) -> TypedValue {
        match self {
            TypedValue::Object(_) => TypedValue::List(vec![self]),
            other => other,
        }
    }

    /// Inverse of [`TypedValue::wrap`]; other values are returned unchanged.
    pub fn unwrap_single(self) -> TypedValue {
        match self {
            TypedValue::List(mut items)
                if items.len() == 1 && matches!(items[0], TypedValue::Object(_)) =>
            {
                items.remove(0)
            }
            other => other,
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            TypedValue::Null
        } else {
            TypedValue::String(s.to_string())
        }
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        TypedValue::Bool(b)
    }
}

impl From<i64> for TypedValue {
    fn from(i: i64) -> Self {
        TypedValue::Integer(i)
    }
}

/// Short JSON kind name used in mismatch messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

pub(crate) fn mismatch(path: &str, expected: &str, found: &Value) -> ShapeMismatchError {
    ShapeMismatchError::Mismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        found: json_kind(found).to_string(),
    }
}

/// Convert a JSON scalar into a typed scalar of the declared kind.
pub(crate) fn scalar_from_json(
    value: &Value,
    scalar: ScalarType,
    path: &str,
) -> Result<TypedValue, ShapeMismatchError> {
    match (scalar, value) {
        (_, Value::Null) => Ok(TypedValue::Null),
        (ScalarType::Bool, Value::Bool(b)) => Ok(TypedValue::Bool(*b)),
        (ScalarType::String, Value::String(s)) => Ok(TypedValue::from(s.as_str())),
        (ScalarType::Number, Value::Number(n)) => match n.as_f64() {
            Some(f) => Ok(TypedValue::Number(f)),
            None => Err(mismatch(path, scalar.as_str(), value)),
        },
        (ScalarType::Integer, Value::Number(n)) => match n.as_i64() {
            Some(i) => Ok(TypedValue::Integer(i)),
            None => Err(mismatch(path, scalar.as_str(), value)),
        },
        _ => Err(mismatch(path, scalar.as_str(), value)),
    }
}

pub(crate) fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

pub(crate) fn non_empty_list(items: Vec<TypedValue>) -> TypedValue {
    if items.is_empty() {
        TypedValue::Null
    } else {
        TypedValue::List(items)
    }
}

pub(crate) fn non_empty_map(entries: BTreeMap<String, TypedValue>) -> TypedValue {
    if entries.is_empty() {
        TypedValue::Null
    } else {
        TypedValue::Map(entries)
    }
}

pub(crate) fn non_empty_object(object: TypedObject) -> TypedValue {
    if object.values().all(TypedValue::is_null) {
        TypedValue::Null
    } else {
        TypedValue::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrap_and_unwrap_are_inverse() {
        let object = TypedValue::Object(BTreeMap::from([("name".into(), TypedValue::from("a"))]));
        let wrapped = object.clone().wrap();
        assert!(matches!(&wrapped, TypedValue::List(items) if items.len() == 1));
        assert_eq!(wrapped.unwrap_single(), object);
        assert_eq!(TypedValue::Null.wrap(), TypedValue::Null);
    }

    #[test]
    fn get_reads_through_wrapped_metadata() {
        let metadata = TypedValue::Object(BTreeMap::from([("name".into(), TypedValue::from("a"))]))
            .wrap();
        assert_eq!(metadata.get("name").and_then(TypedValue::as_str), Some("a"));
    }

    #[test]
    fn empty_strings_are_null() {
        assert_eq!(TypedValue::from(""), TypedValue::Null);
        assert_eq!(
            scalar_from_json(&json!(""), ScalarType::String, "x").unwrap(),
            TypedValue::Null
        );
    }

    #[test]
    fn integers_reject_fractions() {
        let err = scalar_from_json(&json!(1.5), ScalarType::Integer, "spec.replicas").unwrap_err();
        assert_eq!(err.path(), "spec.replicas");
        assert_eq!(
            scalar_from_json(&json!(3), ScalarType::Number, "x").unwrap(),
            TypedValue::Number(3.0)
        );
    }

    #[test]
    fn serializes_as_plain_json() {
        let value = TypedValue::Object(BTreeMap::from([
            ("kind".into(), TypedValue::from("ConfigMap")),
            ("replicas".into(), TypedValue::Integer(3)),
            ("unset".into(), TypedValue::Null),
        ]));
        assert_eq!(
            value.to_json(),
            json!({"kind": "ConfigMap", "replicas": 3, "unset": null})
        );
    }
}
