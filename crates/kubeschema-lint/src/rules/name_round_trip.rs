//! Rule: name-round-trip
//!
//! Flags attributes whose manifest key would not convert back to the same
//! attribute name, and attributes with acronym segments that produce a
//! camel-case key the API server is unlikely to use (`cluster_ip` →
//! `clusterIp`). Both need an entry in `name_overrides`.

use kubeschema_core::naming::{to_manifest_key, to_schema_name};
use kubeschema_core::types::DerivedResource;

use crate::{walk_fields, LintDiagnostic, LintRule, LintSeverity};

/// Segments that Kubernetes API keys spell in upper case.
const ACRONYMS: &[&str] = &[
    "api", "cidr", "cidrs", "dns", "fs", "http", "https", "id", "ip", "ips", "tcp", "tls", "udp",
    "uid", "uri", "url",
];

pub struct NameRoundTripRule;

impl LintRule for NameRoundTripRule {
    fn id(&self) -> &str {
        "name-round-trip"
    }

    fn description(&self) -> &str {
        "Attribute names should convert to manifest keys and back without loss"
    }

    fn default_severity(&self) -> LintSeverity {
        LintSeverity::Warning
    }

    fn check(&self, resource: &DerivedResource) -> Vec<LintDiagnostic> {
        let mut diagnostics = Vec::new();

        walk_fields(&resource.fields, "", &mut |field, path| {
            // overridden keys are checked by whoever wrote the override
            if field.manifest_key != to_manifest_key(&field.attribute_name) {
                return;
            }
            let name = &field.attribute_name;
            if to_schema_name(&field.manifest_key) != *name {
                diagnostics.push(self.diagnostic(
                    resource,
                    path,
                    format!(
                        "Manifest key \"{}\" reads back as \"{}\", not \"{name}\"",
                        field.manifest_key,
                        to_schema_name(&field.manifest_key)
                    ),
                ));
            } else if let Some(segment) = name.split('_').skip(1).find(|s| ACRONYMS.contains(s)) {
                diagnostics.push(self.diagnostic(
                    resource,
                    path,
                    format!(
                        "Manifest key \"{}\" spells \"{segment}\" in mixed case; add a name override if the API uses \"{}\"",
                        field.manifest_key,
                        segment.to_uppercase()
                    ),
                ));
            }
        });

        diagnostics
    }
}
