//! Linter for derived resource schemas: configurable rules for naming and
//! schema shape.
//!
//! Rules run over the output of schema derivation, so they see attribute
//! paths and manifest keys exactly as expand and flatten will use them.

mod rules;

use kubeschema_core::types::{Attribute, DerivedResource, FieldKind, FieldMapping};
pub use rules::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Lint severity (separate from derivation diagnostics)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    Error,
    Warning,
    Info,
}

// ---------------------------------------------------------------------------
// Lint diagnostic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintDiagnostic {
    pub rule: String,
    pub severity: LintSeverity,
    /// Resource name from the generator config.
    pub resource: String,
    /// Attribute path, empty for findings about the resource itself.
    pub path: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Lint rule trait
// ---------------------------------------------------------------------------

/// Trait that all lint rules must implement.
pub trait LintRule: Send + Sync {
    /// Unique rule identifier (e.g., "naming-convention").
    fn id(&self) -> &str;

    fn description(&self) -> &str;

    fn default_severity(&self) -> LintSeverity;

    /// Run the rule against one derived resource.
    fn check(&self, resource: &DerivedResource) -> Vec<LintDiagnostic>;

    fn diagnostic(&self, resource: &DerivedResource, path: &str, message: String) -> LintDiagnostic {
        LintDiagnostic {
            rule: self.id().into(),
            severity: self.default_severity(),
            resource: resource.schema.name.clone(),
            path: path.into(),
            message,
        }
    }
}

// ---------------------------------------------------------------------------
// Lint configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Off,
    #[default]
    Warn,
    Error,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintConfig {
    #[serde(default)]
    pub rules: HashMap<String, RuleLevel>,
}

impl LintConfig {
    pub fn is_enabled(&self, rule_id: &str) -> bool {
        !matches!(self.rules.get(rule_id), Some(RuleLevel::Off))
    }

    /// Configured severity for a rule, or its default.
    pub fn severity_for(&self, rule: &dyn LintRule) -> LintSeverity {
        match self.rules.get(rule.id()) {
            Some(RuleLevel::Error) => LintSeverity::Error,
            Some(RuleLevel::Warn) | Some(RuleLevel::Off) => LintSeverity::Warning,
            None => rule.default_severity(),
        }
    }
}

// ---------------------------------------------------------------------------
// Linter engine
// ---------------------------------------------------------------------------

pub struct Linter {
    rules: Vec<Box<dyn LintRule>>,
    config: LintConfig,
}

impl Linter {
    /// Create a new linter with all built-in rules.
    pub fn new(config: LintConfig) -> Self {
        Self {
            rules: builtin_rules(),
            config,
        }
    }

    pub fn rules(&self) -> &[Box<dyn LintRule>] {
        &self.rules
    }

    /// Run all enabled rules against a derived resource.
    pub fn lint(&self, resource: &DerivedResource) -> Vec<LintDiagnostic> {
        let mut diagnostics = Vec::new();

        for rule in &self.rules {
            if self.config.is_enabled(rule.id()) {
                let severity = self.config.severity_for(rule.as_ref());
                let mut results = rule.check(resource);
                for d in &mut results {
                    d.severity = severity.clone();
                }
                diagnostics.extend(results);
            }
        }

        diagnostics
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new(LintConfig::default())
    }
}

fn builtin_rules() -> Vec<Box<dyn LintRule>> {
    vec![
        Box::new(NamingConventionRule),
        Box::new(NameRoundTripRule),
        Box::new(SchemaSizeRule::default()),
    ]
}

/// Visit every attribute depth-first with its nesting depth (root = 1).
pub(crate) fn walk_attributes<'a>(
    attrs: &'a [Attribute],
    depth: usize,
    f: &mut dyn FnMut(&'a Attribute, usize),
) {
    for attr in attrs {
        f(attr, depth);
        if let Some(children) = attr.attribute_type.attributes() {
            walk_attributes(children, depth + 1, f);
        }
    }
}

/// Visit every non-synthetic field mapping with its attribute path.
pub(crate) fn walk_fields<'a>(
    fields: &'a [FieldMapping],
    prefix: &str,
    f: &mut dyn FnMut(&'a FieldMapping, &str),
) {
    for field in fields.iter().filter(|f| !f.synthetic) {
        let path = format!("{prefix}{}", field.attribute_name);
        f(field, &path);
        match &field.kind {
            FieldKind::Object { fields } => walk_fields(fields, &format!("{path}."), f),
            FieldKind::ListObject { fields } => walk_fields(fields, &format!("{path}[*]."), f),
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
