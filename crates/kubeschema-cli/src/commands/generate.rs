use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use kubeschema_core::{DerivedResource, DiagnosticSeverity, FieldMapping, GENERATOR_VERSION};

use crate::reader::{find_configs, read_config};

const RESOURCES_LIST_FILE: &str = "resources_list_gen.json";

struct Output {
    path: PathBuf,
    json: String,
}

#[derive(Serialize)]
struct ResourceListEntry<'a> {
    name: &'a str,
    api_version: &'a str,
    kind: &'a str,
    config: String,
}

#[derive(Serialize)]
struct ResourceList<'a> {
    generator_version: &'static str,
    resources: Vec<ResourceListEntry<'a>>,
}

#[derive(Serialize)]
struct SchemaDocument<'a, T: Serialize> {
    generator_version: &'static str,
    resource: &'a str,
    #[serde(flatten)]
    body: T,
}

#[derive(Serialize)]
struct FieldsBody<'a> {
    fields: &'a [FieldMapping],
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization error: {e}"))
}

/// Derive every enabled resource, then write the outputs.
///
/// All resources are derived before anything is written, so a derivation
/// error leaves the previous outputs untouched.
pub fn run_generate(input_path: &Path, dry_run: bool) -> Result<String, String> {
    let config_paths = find_configs(input_path)?;

    let mut derived: Vec<(&PathBuf, DerivedResource)> = Vec::new();
    let mut outputs: Vec<Output> = Vec::new();

    for config_path in &config_paths {
        let file = read_config(config_path)?;
        for resource in file.config.enabled() {
            let result = file.derive(resource)?;
            let prefix = resource.output_prefix();

            if resource.generate.schema {
                outputs.push(Output {
                    path: file.dir.join(format!("{prefix}_schema_gen.json")),
                    json: to_json(&SchemaDocument {
                        generator_version: GENERATOR_VERSION,
                        resource: &resource.name,
                        body: &result.schema,
                    })?,
                });
            }
            if resource.generate.fields {
                outputs.push(Output {
                    path: file.dir.join(format!("{prefix}_fields_gen.json")),
                    json: to_json(&SchemaDocument {
                        generator_version: GENERATOR_VERSION,
                        resource: &resource.name,
                        body: FieldsBody {
                            fields: &result.fields,
                        },
                    })?,
                });
            }
            derived.push((config_path, result));
        }
    }

    let list = ResourceList {
        generator_version: GENERATOR_VERSION,
        resources: derived
            .iter()
            .map(|(config, d)| ResourceListEntry {
                name: &d.schema.name,
                api_version: &d.schema.api_version,
                kind: &d.schema.kind,
                config: config.to_string_lossy().replace('\\', "/"),
            })
            .collect(),
    };
    let list_dir = if input_path.is_file() {
        input_path.parent().unwrap_or(Path::new(".")).to_path_buf()
    } else {
        input_path.to_path_buf()
    };
    outputs.push(Output {
        path: list_dir.join(RESOURCES_LIST_FILE),
        json: to_json(&list)?,
    });

    let mut lines: Vec<String> = Vec::new();
    let mut warning_count = 0;
    for (_, d) in &derived {
        let name = &d.schema.name;
        for diag in &d.diagnostics {
            let severity = match diag.severity {
                DiagnosticSeverity::Error => "error",
                DiagnosticSeverity::Warning => "warning",
            };
            warning_count += 1;
            lines.push(format!("{name}:{} {severity}[{}]: {}", diag.path, diag.code, diag.message));
        }
    }

    for output in &outputs {
        if dry_run {
            lines.push(format!("would write {}", output.path.display()));
            continue;
        }
        fs::write(&output.path, format!("{}\n", output.json))
            .map_err(|e| format!("Failed to write {}: {e}", output.path.display()))?;
        info!(path = %output.path.display(), "wrote output");
        lines.push(format!("wrote {}", output.path.display()));
    }

    let count = derived.len();
    let resource_word = if count == 1 { "resource" } else { "resources" };
    let warning_word = if warning_count == 1 { "warning" } else { "warnings" };
    lines.push(format!(
        "{count} {resource_word} generated, {warning_count} {warning_word}."
    ));

    Ok(lines.join("\n"))
}
