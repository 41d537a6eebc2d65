use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::catalogs::{DEFAULT_SYNTHETIC_DEFAULTS, IDENTIFIER_ATTRIBUTE, METADATA_KEY};
use crate::naming::NameMapper;

// ---------------------------------------------------------------------------
// Resource spec (input, read-only)
// ---------------------------------------------------------------------------

/// One node of an abstract resource specification.
///
/// Type names are kept as written and checked against the type catalog
/// during derivation, so an unsupported type is reported with its path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeSpec>,
}

impl AttributeSpec {
    pub fn scalar(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            element_type: None,
            description: None,
            attributes: Vec::new(),
        }
    }

    pub fn collection(name: &str, type_name: &str, element_type: &str) -> Self {
        Self {
            element_type: Some(element_type.to_string()),
            ..Self::scalar(name, type_name)
        }
    }

    pub fn nested(name: &str, type_name: &str, attributes: Vec<AttributeSpec>) -> Self {
        Self {
            attributes,
            ..Self::scalar(name, type_name)
        }
    }
}

/// Path-keyed modifiers applied during derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModifierSets {
    pub ignored: HashSet<String>,
    pub required: HashSet<String>,
    pub computed: HashSet<String>,
    pub sensitive: HashSet<String>,
    pub immutable: HashSet<String>,
    pub default_value: HashSet<String>,
    pub synthetic_defaults: HashSet<String>,
}

impl ModifierSets {
    /// Empty sets with the standard synthetic default paths.
    pub fn with_standard_defaults() -> Self {
        Self {
            synthetic_defaults: DEFAULT_SYNTHETIC_DEFAULTS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            ..Self::default()
        }
    }

    /// True when `path` lies inside a subtree removed by an ignored path.
    pub fn under_ignored(&self, path: &str) -> bool {
        self.ignored.iter().any(|ignored| {
            path.strip_prefix(ignored.as_str())
                .is_some_and(|rest| rest.starts_with('.') || rest.starts_with("[*]."))
        })
    }

    /// Every (set name, path) pair, used to report paths that matched nothing.
    pub fn all_paths(&self) -> impl Iterator<Item = (&'static str, &String)> {
        let sets: [(&'static str, &HashSet<String>); 7] = [
            ("ignored", &self.ignored),
            ("required", &self.required),
            ("computed", &self.computed),
            ("sensitive", &self.sensitive),
            ("immutable", &self.immutable),
            ("default_value", &self.default_value),
            ("synthetic_defaults", &self.synthetic_defaults),
        ];
        sets.into_iter()
            .flat_map(|(name, set)| set.iter().map(move |p| (name, p)))
    }
}

// ---------------------------------------------------------------------------
// Attribute schema (derived)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Bool,
    String,
    Number,
    Integer,
}

impl ScalarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::String => "string",
            ScalarType::Number => "number",
            ScalarType::Integer => "integer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeType {
    Bool,
    String,
    Number,
    Integer,
    Map { element: ScalarType },
    List { element: ScalarType },
    Object { attributes: Vec<Attribute> },
    ListObject { attributes: Vec<Attribute> },
}

impl AttributeType {
    pub fn from_scalar(scalar: ScalarType) -> Self {
        match scalar {
            ScalarType::Bool => AttributeType::Bool,
            ScalarType::String => AttributeType::String,
            ScalarType::Number => AttributeType::Number,
            ScalarType::Integer => AttributeType::Integer,
        }
    }

    /// Child attributes of nested kinds.
    pub fn attributes(&self) -> Option<&[Attribute]> {
        match self {
            AttributeType::Object { attributes } | AttributeType::ListObject { attributes } => {
                Some(attributes)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub path: String,
    #[serde(flatten)]
    pub attribute_type: AttributeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub immutable: bool,
    pub has_default: bool,
    pub synthetic_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSchema {
    pub name: String,
    pub api_version: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    /// Find an attribute by its full path (`metadata.labels`, `spec.ports[*].port`).
    pub fn find(&self, path: &str) -> Option<&Attribute> {
        fn walk<'a>(attrs: &'a [Attribute], path: &str) -> Option<&'a Attribute> {
            for attr in attrs {
                if attr.path == path {
                    return Some(attr);
                }
                if let Some(children) = attr.attribute_type.attributes() {
                    if let Some(found) = walk(children, path) {
                        return Some(found);
                    }
                }
            }
            None
        }
        walk(&self.attributes, path)
    }
}

// ---------------------------------------------------------------------------
// Field mapping (derived, parallel to the schema)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Bool,
    String,
    Number,
    Integer,
    Map { element: ScalarType },
    List { element: ScalarType },
    Object { fields: Vec<FieldMapping> },
    ListObject { fields: Vec<FieldMapping> },
}

impl FieldKind {
    pub fn from_scalar(scalar: ScalarType) -> Self {
        match scalar {
            ScalarType::Bool => FieldKind::Bool,
            ScalarType::String => FieldKind::String,
            ScalarType::Number => FieldKind::Number,
            ScalarType::Integer => FieldKind::Integer,
        }
    }

    pub fn scalar(&self) -> Option<ScalarType> {
        match self {
            FieldKind::Bool => Some(ScalarType::Bool),
            FieldKind::String => Some(ScalarType::String),
            FieldKind::Number => Some(ScalarType::Number),
            FieldKind::Integer => Some(ScalarType::Integer),
            _ => None,
        }
    }

    pub fn fields(&self) -> Option<&[FieldMapping]> {
        match self {
            FieldKind::Object { fields } | FieldKind::ListObject { fields } => Some(fields),
            _ => None,
        }
    }
}

/// Schema attribute name ↔ manifest key ↔ model field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub attribute_name: String,
    pub manifest_key: String,
    pub field_name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Computed locally, never read from or written to a manifest.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

/// Output of schema derivation for one resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedResource {
    pub schema: ResourceSchema,
    pub fields: Vec<FieldMapping>,
    pub diagnostics: Vec<Diagnostic>,
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub severity: DiagnosticSeverity,
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

// ---------------------------------------------------------------------------
// Mapping context
// ---------------------------------------------------------------------------

/// Options shared by expand and flatten. Built once and passed explicitly.
#[derive(Debug, Clone)]
pub struct MappingOptions {
    pub names: NameMapper,
    /// Manifest key of the metadata section.
    pub metadata_key: String,
    /// Present metadata-keyed objects as a one-element list in typed values.
    pub wrap_metadata: bool,
    /// Root attribute holding the synthetic resource identifier.
    pub identifier_key: String,
    /// Synthesize `metadata.generation = 0` when a manifest omits it.
    pub default_generation: bool,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            names: NameMapper::default(),
            metadata_key: METADATA_KEY.to_string(),
            wrap_metadata: true,
            identifier_key: IDENTIFIER_ATTRIBUTE.to_string(),
            default_generation: true,
        }
    }
}

impl MappingOptions {
    pub fn with_names(names: NameMapper) -> Self {
        Self {
            names,
            ..Self::default()
        }
    }
}
