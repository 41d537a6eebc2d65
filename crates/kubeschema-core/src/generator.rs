use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::catalogs::{
    scalar_type, SpecType, IDENTIFIER_ATTRIBUTE, IDENTIFIER_DESCRIPTION, TYPE_CATALOG,
};
use crate::error::DerivationError;
use crate::naming::NameMapper;
use crate::types::*;

/// Resource identity carried into the derived schema.
#[derive(Debug, Clone, Default)]
pub struct ResourceHeader {
    pub name: String,
    pub api_version: String,
    pub kind: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DeriveOptions {
    pub names: NameMapper,
    /// Drop containers left without attributes instead of failing.
    pub drop_empty_containers: bool,
}

/// Derive the attribute schema and field mapping for one resource.
///
/// The synthetic identifier attribute is always first. Ignored paths are
/// removed together with their descendants before anything else is decided.
pub fn derive_resource(
    header: ResourceHeader,
    spec: &[AttributeSpec],
    modifiers: &ModifierSets,
    options: &DeriveOptions,
) -> Result<DerivedResource, DerivationError> {
    let mut deriver = Deriver {
        modifiers,
        options,
        matched: HashSet::new(),
        diagnostics: Vec::new(),
    };

    let (mut attributes, mut fields) = deriver.derive_attributes(spec, "")?;

    if let Some(pos) = attributes.iter().position(|a| a.name == IDENTIFIER_ATTRIBUTE) {
        deriver.warning(
            "KS-W004",
            IDENTIFIER_ATTRIBUTE,
            "Attribute \"id\" is reserved for the resource identifier and was removed".into(),
        );
        attributes.remove(pos);
        fields.remove(pos);
    }
    attributes.insert(0, identifier_attribute());
    fields.insert(0, identifier_field());

    for (set, path) in modifiers.all_paths() {
        if !deriver.matched.contains(path) && !modifiers.under_ignored(path) {
            deriver.warning(
                "KS-W002",
                path,
                format!("Path \"{path}\" in {set} does not match any attribute"),
            );
        }
    }

    info!(
        resource = %header.name,
        attributes = attributes.len(),
        diagnostics = deriver.diagnostics.len(),
        "derived resource schema"
    );

    Ok(DerivedResource {
        schema: ResourceSchema {
            name: header.name,
            api_version: header.api_version,
            kind: header.kind,
            description: header.description,
            attributes,
        },
        fields,
        diagnostics: deriver.diagnostics,
    })
}

fn identifier_attribute() -> Attribute {
    Attribute {
        name: IDENTIFIER_ATTRIBUTE.to_string(),
        path: IDENTIFIER_ATTRIBUTE.to_string(),
        attribute_type: AttributeType::String,
        description: Some(IDENTIFIER_DESCRIPTION.to_string()),
        required: false,
        computed: true,
        sensitive: false,
        immutable: false,
        has_default: false,
        synthetic_default: false,
    }
}

fn identifier_field() -> FieldMapping {
    FieldMapping {
        attribute_name: IDENTIFIER_ATTRIBUTE.to_string(),
        manifest_key: crate::naming::to_manifest_key(IDENTIFIER_ATTRIBUTE),
        field_name: crate::naming::to_field_name(IDENTIFIER_ATTRIBUTE),
        kind: FieldKind::String,
        synthetic: true,
    }
}

struct Deriver<'a> {
    modifiers: &'a ModifierSets,
    options: &'a DeriveOptions,
    /// Modifier paths that matched an attribute.
    matched: HashSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Deriver<'_> {
    fn derive_attributes(
        &mut self,
        specs: &[AttributeSpec],
        prefix: &str,
    ) -> Result<(Vec<Attribute>, Vec<FieldMapping>), DerivationError> {
        let mut attributes = Vec::with_capacity(specs.len());
        let mut fields = Vec::with_capacity(specs.len());
        let mut seen: HashSet<&str> = HashSet::new();
        let mut manifest_keys: HashSet<String> = HashSet::new();

        for spec in specs {
            let path = format!("{prefix}{}", spec.name);
            if !seen.insert(spec.name.as_str()) {
                return Err(DerivationError::DuplicateAttribute { path });
            }

            if self.modifiers.ignored.contains(&path) {
                debug!(%path, "ignoring attribute");
                self.matched.insert(path);
                continue;
            }

            let Some((attribute_type, kind)) = self.resolve_type(spec, &path)? else {
                continue;
            };

            let manifest_key = self.options.names.to_manifest_key(&spec.name);
            if !manifest_keys.insert(manifest_key.clone()) {
                return Err(DerivationError::DuplicateManifestKey {
                    path,
                    key: manifest_key,
                });
            }

            let modifiers = self.modifiers;
            let required = self.flag(&modifiers.required, &path);
            let computed = self.flag(&modifiers.computed, &path);
            if required && computed {
                self.warning(
                    "KS-W003",
                    &path,
                    format!("Attribute \"{path}\" is marked both required and computed"),
                );
            }

            attributes.push(Attribute {
                name: spec.name.clone(),
                path: path.clone(),
                attribute_type,
                description: spec.description.clone(),
                required,
                computed,
                sensitive: self.flag(&modifiers.sensitive, &path),
                immutable: self.flag(&modifiers.immutable, &path),
                has_default: self.flag(&modifiers.default_value, &path),
                synthetic_default: self.flag(&modifiers.synthetic_defaults, &path),
            });
            fields.push(FieldMapping {
                attribute_name: spec.name.clone(),
                manifest_key,
                field_name: self.options.names.to_field_name(&spec.name),
                kind,
                synthetic: false,
            });
        }

        Ok((attributes, fields))
    }

    /// Resolve the attribute and field kinds. `None` means the node was dropped.
    fn resolve_type(
        &mut self,
        spec: &AttributeSpec,
        path: &str,
    ) -> Result<Option<(AttributeType, FieldKind)>, DerivationError> {
        let Some(spec_type) = TYPE_CATALOG.get(spec.type_name.as_str()).copied() else {
            return Err(DerivationError::UnsupportedType {
                path: path.to_string(),
                type_name: spec.type_name.clone(),
            });
        };

        let resolved = match spec_type {
            SpecType::Scalar(s) => (AttributeType::from_scalar(s), FieldKind::from_scalar(s)),
            SpecType::Map => {
                let element = element_type(spec, path)?;
                (AttributeType::Map { element }, FieldKind::Map { element })
            }
            SpecType::List => {
                let element = element_type(spec, path)?;
                (AttributeType::List { element }, FieldKind::List { element })
            }
            SpecType::Object | SpecType::ListObject => {
                let child_prefix = if spec_type == SpecType::Object {
                    format!("{path}.")
                } else {
                    format!("{path}[*].")
                };
                let (attributes, fields) = self.derive_attributes(&spec.attributes, &child_prefix)?;

                if attributes.is_empty() {
                    if !self.options.drop_empty_containers {
                        return Err(DerivationError::EmptyContainer {
                            path: path.to_string(),
                        });
                    }
                    self.warning(
                        "KS-W001",
                        path,
                        format!("Nested attribute \"{path}\" has no attributes and was dropped"),
                    );
                    return Ok(None);
                }

                if spec_type == SpecType::Object {
                    (
                        AttributeType::Object { attributes },
                        FieldKind::Object { fields },
                    )
                } else {
                    (
                        AttributeType::ListObject { attributes },
                        FieldKind::ListObject { fields },
                    )
                }
            }
        };

        Ok(Some(resolved))
    }

    fn flag(&mut self, set: &HashSet<String>, path: &str) -> bool {
        let hit = set.contains(path);
        if hit {
            self.matched.insert(path.to_string());
        }
        hit
    }

    fn warning(&mut self, code: &str, path: &str, message: String) {
        warn!(code, path, "{message}");
        self.diagnostics.push(Diagnostic {
            code: code.to_string(),
            severity: DiagnosticSeverity::Warning,
            path: path.to_string(),
            message,
        });
    }
}

fn element_type(spec: &AttributeSpec, path: &str) -> Result<ScalarType, DerivationError> {
    let Some(element) = spec.element_type.as_deref() else {
        return Err(DerivationError::MissingElementType {
            path: path.to_string(),
            type_name: spec.type_name.clone(),
        });
    };
    scalar_type(element).ok_or_else(|| DerivationError::UnsupportedElementType {
        path: path.to_string(),
        element: element.to_string(),
    })
}
