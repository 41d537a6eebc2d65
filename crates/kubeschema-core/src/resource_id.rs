//! Resource identifiers: `<namespace>/<name>`, or `<name>` for cluster-scoped
//! resources.

use serde_json::Value;

use crate::catalogs::METADATA_KEY;
use crate::value::Manifest;

/// Identifier of the object described by a manifest, `None` without a name.
pub fn create_id(manifest: &Manifest) -> Option<String> {
    let metadata = manifest.get(METADATA_KEY)?.as_object()?;
    let name = metadata.get("name").and_then(Value::as_str)?;
    match metadata.get("namespace").and_then(Value::as_str) {
        Some(ns) if !ns.is_empty() => Some(format!("{ns}/{name}")),
        _ => Some(name.to_string()),
    }
}

/// Split an identifier into `(namespace, name)`; the namespace is empty for
/// cluster-scoped identifiers.
pub fn parse_id(id: &str) -> (&str, &str) {
    match id.split_once('/') {
        Some((namespace, name)) => (namespace, name),
        None => ("", id),
    }
}
