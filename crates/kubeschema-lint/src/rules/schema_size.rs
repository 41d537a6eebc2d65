//! Rule: schema-size
//!
//! Warns when a resource has too many attributes (default threshold: 200)
//! or nests them too deeply (default threshold: 8 levels).

use kubeschema_core::types::DerivedResource;

use crate::{walk_attributes, LintDiagnostic, LintRule, LintSeverity};

const DEFAULT_MAX_ATTRIBUTES: usize = 200;
const DEFAULT_MAX_DEPTH: usize = 8;

pub struct SchemaSizeRule {
    pub max_attributes: usize,
    pub max_depth: usize,
}

impl Default for SchemaSizeRule {
    fn default() -> Self {
        Self {
            max_attributes: DEFAULT_MAX_ATTRIBUTES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl LintRule for SchemaSizeRule {
    fn id(&self) -> &str {
        "schema-size"
    }

    fn description(&self) -> &str {
        "Resources should not have too many or too deeply nested attributes"
    }

    fn default_severity(&self) -> LintSeverity {
        LintSeverity::Warning
    }

    fn check(&self, resource: &DerivedResource) -> Vec<LintDiagnostic> {
        let mut diagnostics = Vec::new();
        let mut count = 0;
        let mut deepest: Option<(&str, usize)> = None;

        walk_attributes(&resource.schema.attributes, 1, &mut |attr, depth| {
            count += 1;
            if depth > deepest.map_or(0, |(_, d)| d) {
                deepest = Some((&attr.path, depth));
            }
        });

        if count > self.max_attributes {
            diagnostics.push(self.diagnostic(
                resource,
                "",
                format!(
                    "Resource \"{}\" has {count} attributes (max {}). Consider ignoring unused paths",
                    resource.schema.name, self.max_attributes
                ),
            ));
        }
        if let Some((path, depth)) = deepest.filter(|(_, d)| *d > self.max_depth) {
            diagnostics.push(self.diagnostic(
                resource,
                path,
                format!("Attribute \"{path}\" is nested {depth} levels deep (max {})", self.max_depth),
            ));
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures::derive;

    fn flat_spec(count: usize) -> String {
        (0..count)
            .map(|i| format!("- {{name: field_{i}, type: string}}\n"))
            .collect()
    }

    fn nested_spec(depth: usize) -> String {
        let mut spec = String::new();
        for level in 0..depth {
            let indent = "  ".repeat(level * 2);
            spec.push_str(&format!("{indent}- name: level_{level}\n{indent}  type: object\n{indent}  attributes:\n"));
        }
        spec.push_str(&format!("{}- {{name: leaf, type: string}}\n", "  ".repeat(depth * 2)));
        spec
    }

    #[test]
    fn detects_large_resource() {
        let resource = derive("r", "R", &flat_spec(250));
        let results = SchemaSizeRule::default().check(&resource);
        assert_eq!(results.len(), 1);
        // the identifier attribute counts too
        assert!(results[0].message.contains("251 attributes"));
    }

    #[test]
    fn detects_deep_nesting() {
        let resource = derive("r", "R", &nested_spec(3));
        let rule = SchemaSizeRule {
            max_depth: 3,
            ..SchemaSizeRule::default()
        };
        let results = rule.check(&resource);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "level_0.level_1.level_2.leaf");
    }

    #[test]
    fn no_warning_for_small_resource() {
        let resource = derive("r", "R", &flat_spec(10));
        assert!(SchemaSizeRule::default().check(&resource).is_empty());
    }
}
