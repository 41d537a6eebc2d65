use std::collections::HashMap;
use std::sync::LazyLock;

use crate::types::ScalarType;

/// Attribute type names accepted in a resource spec.
/// Names not in this table are rejected at derivation time.
pub static TYPE_CATALOG: LazyLock<HashMap<&'static str, SpecType>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    // Scalars
    m.insert("bool", SpecType::Scalar(ScalarType::Bool));
    m.insert("string", SpecType::Scalar(ScalarType::String));
    m.insert("number", SpecType::Scalar(ScalarType::Number));
    m.insert("integer", SpecType::Scalar(ScalarType::Integer));
    // Collections of scalars
    m.insert("map", SpecType::Map);
    m.insert("list", SpecType::List);
    // Nested attributes
    m.insert("object", SpecType::Object);
    m.insert("list_object", SpecType::ListObject);
    // Aliases used by plugin codegen specs
    m.insert("int64", SpecType::Scalar(ScalarType::Integer));
    m.insert("single_nested", SpecType::Object);
    m.insert("list_nested", SpecType::ListObject);
    m
});

/// Resolved spec type name, before element and child checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecType {
    Scalar(ScalarType),
    Map,
    List,
    Object,
    ListObject,
}

/// Look up a scalar element type name (`map`/`list` element types).
pub fn scalar_type(name: &str) -> Option<ScalarType> {
    match TYPE_CATALOG.get(name) {
        Some(SpecType::Scalar(s)) => Some(*s),
        _ => None,
    }
}

/// Attribute names whose manifest key and model field name bypass the
/// automatic conversion: (attribute name, manifest key, model field name).
pub const EXPLICIT_MAPPINGS: &[(&str, &str, &str)] = &[
    ("api_version", "apiVersion", "APIVersion"),
    ("uid", "uid", "UID"),
    ("id", "id", "ID"),
];

/// Name of the synthetic identifier attribute prepended to every resource.
pub const IDENTIFIER_ATTRIBUTE: &str = "id";
pub const IDENTIFIER_DESCRIPTION: &str =
    "The unique ID for this resource, in the form <namespace>/<name>";

/// Manifest key of the metadata section.
pub const METADATA_KEY: &str = "metadata";
pub const GENERATION_KEY: &str = "generation";
pub const LABELS_KEY: &str = "labels";
pub const ANNOTATIONS_KEY: &str = "annotations";

/// Attribute paths that receive a tool-attached default unless configured.
pub const DEFAULT_SYNTHETIC_DEFAULTS: &[&str] = &["metadata.namespace"];

/// Metadata keys under this domain are system managed.
pub const RESERVED_DOMAIN_SUFFIX: &str = "kubernetes.io";

/// Authorities under the reserved domain that carry user configuration:
/// recommended application labels and load balancer annotations.
pub const ALLOWED_AUTHORITIES: &[&str] = &["app.kubernetes.io", "service.beta.kubernetes.io"];

/// Server-controlled DaemonSet annotation.
pub const DAEMONSET_GENERATION_KEY: &str = "deprecated.daemonset.template.generation";

pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");
