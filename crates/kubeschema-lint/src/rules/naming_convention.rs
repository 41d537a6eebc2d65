//! Rule: naming-convention
//!
//! Checks that resource and attribute names are snake_case and the kind is
//! PascalCase.

use kubeschema_core::types::DerivedResource;

use crate::{walk_attributes, LintDiagnostic, LintRule, LintSeverity};

pub struct NamingConventionRule;

impl LintRule for NamingConventionRule {
    fn id(&self) -> &str {
        "naming-convention"
    }

    fn description(&self) -> &str {
        "Resource and attribute names should be snake_case, kinds should be PascalCase"
    }

    fn default_severity(&self) -> LintSeverity {
        LintSeverity::Warning
    }

    fn check(&self, resource: &DerivedResource) -> Vec<LintDiagnostic> {
        let mut diagnostics = Vec::new();
        let schema = &resource.schema;

        if !is_snake_case(&schema.name) {
            diagnostics.push(self.diagnostic(
                resource,
                "",
                format!("Resource name \"{}\" should be snake_case", schema.name),
            ));
        }
        if !is_pascal_case(&schema.kind) {
            diagnostics.push(self.diagnostic(
                resource,
                "",
                format!("Kind \"{}\" should be PascalCase", schema.kind),
            ));
        }

        walk_attributes(&schema.attributes, 1, &mut |attr, _| {
            if !is_snake_case(&attr.name) {
                diagnostics.push(self.diagnostic(
                    resource,
                    &attr.path,
                    format!("Attribute name \"{}\" should be snake_case", attr.name),
                ));
            }
        });

        diagnostics
    }
}

/// Starts with an uppercase letter, no underscores.
fn is_pascal_case(name: &str) -> bool {
    match name.chars().next() {
        Some(first) if first.is_ascii_uppercase() => !name.contains('_'),
        _ => false,
    }
}

/// Lowercase letters, digits and underscores, starting with a letter.
fn is_snake_case(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures::derive;

    #[test]
    fn pascal_case() {
        assert!(is_pascal_case("ConfigMap"));
        assert!(is_pascal_case("CSIDriver"));
        assert!(!is_pascal_case("configMap"));
        assert!(!is_pascal_case("Config_Map"));
        assert!(!is_pascal_case(""));
    }

    #[test]
    fn snake_case() {
        assert!(is_snake_case("api_version"));
        assert!(is_snake_case("ipv6_address"));
        assert!(!is_snake_case("apiVersion"));
        assert!(!is_snake_case("_private"));
        assert!(!is_snake_case("UID"));
    }

    #[test]
    fn detects_camel_case_attributes() {
        let resource = derive(
            "kubernetes_service_v1",
            "Service",
            "- name: spec\n  type: object\n  attributes:\n    - {name: clusterIP, type: string}\n",
        );
        let results = NamingConventionRule.check(&resource);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "spec.clusterIP");
        assert!(results[0].message.contains("snake_case"));
    }

    #[test]
    fn detects_bad_resource_names() {
        let resource = derive("KubernetesService", "service", "- {name: kind, type: string}\n");
        let results = NamingConventionRule.check(&resource);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|d| d.path.is_empty()));
    }

    #[test]
    fn no_warnings_for_correct_names() {
        let resource = derive(
            "kubernetes_service_v1",
            "Service",
            "- {name: api_version, type: string}\n- {name: kind, type: string}\n",
        );
        assert!(NamingConventionRule.check(&resource).is_empty());
    }
}
