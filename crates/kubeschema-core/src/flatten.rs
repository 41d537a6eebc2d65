//! Manifest → typed value.

use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::debug;

use crate::catalogs::GENERATION_KEY;
use crate::error::ShapeMismatchError;
use crate::expand::expand;
use crate::metadata::{default_generation, MetadataFilter};
use crate::resource_id::create_id;
use crate::types::{FieldKind, FieldMapping, MappingOptions};
use crate::value::{
    join, mismatch, non_empty_list, non_empty_map, non_empty_object, scalar_from_json, Manifest,
    TypedObject, TypedValue,
};

/// Result of flattening a manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flattened {
    /// Every schema attribute, `Null` when unset.
    pub value: TypedObject,
    /// Paths of manifest keys with no matching attribute; they were dropped.
    pub unknown_keys: Vec<String>,
}

/// Build a typed root object from a manifest.
///
/// Keys resolve through the field mapping first and then through the name
/// converter. Unknown keys are dropped and reported, never an error; a value
/// whose kind disagrees with its attribute is.
pub fn flatten(
    manifest: &Manifest,
    fields: &[FieldMapping],
    options: &MappingOptions,
) -> Result<Flattened, ShapeMismatchError> {
    let manifest = normalize_metadata(manifest, options)?;
    let mut flattener = Flattener {
        options,
        by_attribute: false,
        unknown_keys: Vec::new(),
    };
    let mut value = flattener.object(&manifest, fields, "")?;

    if let Some(id_field) = fields
        .iter()
        .find(|f| f.synthetic && f.attribute_name == options.identifier_key)
    {
        let id = create_id(&manifest).map_or(TypedValue::Null, |id| TypedValue::from(id.as_str()));
        value.insert(id_field.attribute_name.clone(), id);
    }

    Ok(Flattened {
        value,
        unknown_keys: flattener.unknown_keys,
    })
}

/// Flatten a server response against the configuration it was produced from.
///
/// Internal labels and annotations, and those matching the filter patterns,
/// are removed from the response metadata first unless the configuration
/// sets them.
pub fn flatten_response(
    response: &Manifest,
    config: &TypedObject,
    fields: &[FieldMapping],
    options: &MappingOptions,
    filter: &MetadataFilter,
) -> Result<Flattened, ShapeMismatchError> {
    let configured = expand(config, fields, options);
    let configured_metadata = configured
        .get(&options.metadata_key)
        .and_then(Value::as_object);

    let mut response = normalize_metadata(response, options)?.into_owned();
    if let Some(Value::Object(metadata)) = response.get_mut(&options.metadata_key) {
        filter.apply(metadata, configured_metadata);
    }
    flatten(&response, fields, options)
}

/// Read a user-authored typed document (snake_case keys) into a typed root
/// object.
///
/// Unlike [`flatten`], keys are attribute names and an unknown key is an
/// error. Nested objects may be written bare or as a one-element list.
pub fn decode_typed(
    value: &Value,
    fields: &[FieldMapping],
    options: &MappingOptions,
) -> Result<TypedObject, ShapeMismatchError> {
    let Value::Object(map) = value else {
        return Err(mismatch("", "mapping", value));
    };
    let mut flattener = Flattener {
        options,
        by_attribute: true,
        unknown_keys: Vec::new(),
    };
    flattener.object(map, fields, "")
}

/// Bring the root metadata to its bare-mapping form and apply the generation
/// default, so the filter and the identifier see the same mapping whether the
/// manifest carried it bare or as a one-element list.
fn normalize_metadata<'a>(
    manifest: &'a Manifest,
    options: &MappingOptions,
) -> Result<Cow<'a, Manifest>, ShapeMismatchError> {
    let key = &options.metadata_key;
    let mut metadata = match manifest.get(key) {
        Some(Value::Array(items)) => match items.as_slice() {
            [Value::Object(m)] => m.clone(),
            [other] => return Err(mismatch(key, "mapping", other)),
            _ => {
                return Err(ShapeMismatchError::WrapperLength {
                    path: key.clone(),
                    len: items.len(),
                })
            }
        },
        Some(Value::Object(m))
            if options.default_generation && !m.contains_key(GENERATION_KEY) =>
        {
            m.clone()
        }
        _ => return Ok(Cow::Borrowed(manifest)),
    };
    if options.default_generation {
        default_generation(&mut metadata);
    }
    let mut owned = manifest.clone();
    owned.insert(key.clone(), Value::Object(metadata));
    Ok(Cow::Owned(owned))
}

struct Flattener<'a> {
    options: &'a MappingOptions,
    /// Keys are attribute names and unknown keys are rejected.
    by_attribute: bool,
    unknown_keys: Vec<String>,
}

impl Flattener<'_> {
    fn resolve<'f>(&self, key: &str, fields: &'f [FieldMapping]) -> Option<&'f FieldMapping> {
        if self.by_attribute {
            return fields.iter().find(|f| f.attribute_name == key);
        }
        let candidates = || fields.iter().filter(|f| !f.synthetic);
        candidates().find(|f| f.manifest_key == key).or_else(|| {
            let name = self.options.names.to_schema_name(key);
            candidates().find(|f| f.attribute_name == name)
        })
    }

    fn object(
        &mut self,
        map: &Manifest,
        fields: &[FieldMapping],
        path: &str,
    ) -> Result<TypedObject, ShapeMismatchError> {
        let mut out: TypedObject = fields
            .iter()
            .map(|f| (f.attribute_name.clone(), TypedValue::Null))
            .collect();

        for (key, value) in map {
            let Some(field) = self.resolve(key, fields) else {
                let key_path = join(path, key);
                if self.by_attribute {
                    return Err(ShapeMismatchError::Mismatch {
                        path: key_path,
                        expected: "a schema attribute".to_string(),
                        found: "unknown key".to_string(),
                    });
                }
                debug!(path = %key_path, "dropping unknown manifest key");
                self.unknown_keys.push(key_path);
                continue;
            };
            let child_path = join(path, &field.attribute_name);
            let typed = self.value(value, field, &child_path)?;
            out.insert(field.attribute_name.clone(), typed);
        }

        Ok(out)
    }

    fn value(
        &mut self,
        value: &Value,
        field: &FieldMapping,
        path: &str,
    ) -> Result<TypedValue, ShapeMismatchError> {
        if value.is_null() {
            return Ok(TypedValue::Null);
        }
        match &field.kind {
            FieldKind::Map { element } => {
                let Value::Object(m) = value else {
                    return Err(mismatch(path, "mapping", value));
                };
                let mut out = BTreeMap::new();
                for (k, v) in m {
                    let typed = scalar_from_json(v, *element, &format!("{path}[{k:?}]"))?;
                    if !typed.is_null() {
                        out.insert(k.clone(), typed);
                    }
                }
                Ok(non_empty_map(out))
            }
            FieldKind::List { element } => {
                let Value::Array(items) = value else {
                    return Err(mismatch(path, "list", value));
                };
                let out = items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| scalar_from_json(v, *element, &format!("{path}[{i}]")))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(non_empty_list(out))
            }
            FieldKind::Object { fields } => {
                let map = match value {
                    Value::Object(m) => m,
                    Value::Array(items) => match items.as_slice() {
                        [Value::Object(m)] => m,
                        [other] => return Err(mismatch(path, "mapping", other)),
                        _ => {
                            return Err(ShapeMismatchError::WrapperLength {
                                path: path.to_string(),
                                len: items.len(),
                            })
                        }
                    },
                    other => return Err(mismatch(path, "mapping", other)),
                };
                let object = non_empty_object(self.object(map, fields, path)?);
                if self.options.wrap_metadata && field.manifest_key == self.options.metadata_key {
                    Ok(object.wrap())
                } else {
                    Ok(object)
                }
            }
            FieldKind::ListObject { fields } => {
                let Value::Array(items) = value else {
                    return Err(mismatch(path, "list", value));
                };
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{path}[{i}]");
                    match item {
                        Value::Null => out.push(TypedValue::Null),
                        Value::Object(m) => {
                            out.push(non_empty_object(self.object(m, fields, &item_path)?))
                        }
                        other => return Err(mismatch(&item_path, "mapping", other)),
                    }
                }
                Ok(non_empty_list(out))
            }
            scalar => match scalar.scalar() {
                Some(s) => scalar_from_json(value, s, path),
                None => Err(mismatch(path, "scalar", value)),
            },
        }
    }
}
