use std::path::Path;

use kubeschema_core::{Attribute, AttributeType, DerivedResource};

use crate::reader::read_config;

pub fn run_inspect(config_path: &Path, resource_name: &str, format: &str) -> Result<String, String> {
    let file = read_config(config_path)?;
    let resource = file.resource(resource_name)?;
    let derived = file.derive(resource)?;

    match format {
        "json" => serde_json::to_string_pretty(&derived)
            .map_err(|e| format!("JSON serialization error: {e}")),
        _ => Ok(render(&derived)),
    }
}

fn render(derived: &DerivedResource) -> String {
    let schema = &derived.schema;
    let mut lines = vec![format!(
        "{} ({}, {})",
        schema.name, schema.api_version, schema.kind
    )];
    render_attributes(&schema.attributes, 1, &mut lines);

    for d in &derived.diagnostics {
        lines.push(format!("warning[{}]: {}", d.code, d.message));
    }
    lines.join("\n")
}

fn render_attributes(attrs: &[Attribute], depth: usize, lines: &mut Vec<String>) {
    for attr in attrs {
        let mut flags = Vec::new();
        for (set, name) in [
            (attr.required, "required"),
            (attr.computed, "computed"),
            (attr.sensitive, "sensitive"),
            (attr.immutable, "immutable"),
            (attr.has_default, "default"),
            (attr.synthetic_default, "synthetic-default"),
        ] {
            if set {
                flags.push(name);
            }
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        lines.push(format!(
            "{}{}: {}{flags}",
            "  ".repeat(depth),
            attr.name,
            type_label(&attr.attribute_type)
        ));
        if let Some(children) = attr.attribute_type.attributes() {
            render_attributes(children, depth + 1, lines);
        }
    }
}

fn type_label(t: &AttributeType) -> String {
    match t {
        AttributeType::Bool => "bool".into(),
        AttributeType::String => "string".into(),
        AttributeType::Number => "number".into(),
        AttributeType::Integer => "integer".into(),
        AttributeType::Map { element } => format!("map<{}>", element.as_str()),
        AttributeType::List { element } => format!("list<{}>", element.as_str()),
        AttributeType::Object { .. } => "object".into(),
        AttributeType::ListObject { .. } => "list<object>".into(),
    }
}
