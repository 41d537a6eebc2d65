//! Typed value → manifest.

use serde_json::{Number, Value};

use crate::types::{FieldMapping, MappingOptions};
use crate::value::{Manifest, TypedObject, TypedValue};

/// Largest magnitude at which every integer is exactly representable as f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Build a manifest from a typed root object.
///
/// Absent and empty values are omitted, so the result is the minimal manifest
/// carrying the same information. The root identifier and other synthetic
/// attributes are never written. Map keys are user data and pass through
/// unchanged; object keys go through the field mapping.
pub fn expand(object: &TypedObject, fields: &[FieldMapping], options: &MappingOptions) -> Manifest {
    let mut manifest = Manifest::new();
    for (name, value) in object {
        if *name == options.identifier_key {
            continue;
        }
        let field = fields.iter().find(|f| &f.attribute_name == name);
        if field.is_some_and(|f| f.synthetic) {
            continue;
        }
        insert_attribute(&mut manifest, name, value, field, options);
    }
    manifest
}

fn expand_object(
    object: &TypedObject,
    fields: &[FieldMapping],
    options: &MappingOptions,
) -> Option<Value> {
    let mut out = Manifest::new();
    for (name, value) in object {
        let field = fields.iter().find(|f| &f.attribute_name == name);
        insert_attribute(&mut out, name, value, field, options);
    }
    (!out.is_empty()).then_some(Value::Object(out))
}

fn insert_attribute(
    out: &mut Manifest,
    name: &str,
    value: &TypedValue,
    field: Option<&FieldMapping>,
    options: &MappingOptions,
) {
    let key = match field {
        Some(f) => f.manifest_key.clone(),
        None => options.names.to_manifest_key(name),
    };
    let children = field.and_then(|f| f.kind.fields()).unwrap_or(&[]);

    let value = if options.wrap_metadata && key == options.metadata_key {
        expand_value(&value.clone().unwrap_single(), children, options)
    } else {
        expand_value(value, children, options)
    };
    if let Some(v) = value {
        out.insert(key, v);
    }
}

/// `None` means the value is absent and its key is omitted.
fn expand_value(value: &TypedValue, children: &[FieldMapping], options: &MappingOptions) -> Option<Value> {
    match value {
        TypedValue::Null => None,
        TypedValue::Bool(b) => Some(Value::Bool(*b)),
        TypedValue::String(s) if s.is_empty() => None,
        TypedValue::String(s) => Some(Value::String(s.clone())),
        TypedValue::Integer(i) => Some(Value::from(*i)),
        TypedValue::Number(f) => number(*f),
        TypedValue::List(items) => {
            if items.is_empty() {
                return None;
            }
            let items = items
                .iter()
                .map(|item| expand_value(item, children, options).unwrap_or(Value::Null))
                .collect();
            Some(Value::Array(items))
        }
        TypedValue::Map(entries) => {
            let out: Manifest = entries
                .iter()
                .filter_map(|(k, v)| expand_value(v, &[], options).map(|v| (k.clone(), v)))
                .collect();
            (!out.is_empty()).then_some(Value::Object(out))
        }
        TypedValue::Object(object) => expand_object(object, children, options),
    }
}

fn number(f: f64) -> Option<Value> {
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        return Some(Value::from(f as i64));
    }
    Number::from_f64(f).map(Value::Number)
}
