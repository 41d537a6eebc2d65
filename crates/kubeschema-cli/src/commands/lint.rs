use std::path::Path;

use kubeschema_lint::{LintConfig, LintSeverity, Linter};

use crate::reader::{find_configs, read_config};

pub fn run_lint(input_path: &Path, format: &str) -> Result<String, String> {
    let config_paths = find_configs(input_path)?;

    let linter = Linter::new(LintConfig::default());
    let mut results = Vec::new();
    let mut resource_count = 0;

    for config_path in &config_paths {
        let file = read_config(config_path)?;
        for resource in file.config.enabled() {
            let derived = file.derive(resource)?;
            results.extend(linter.lint(&derived));
            resource_count += 1;
        }
    }

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "diagnostics": results,
                "summary": {
                    "count": results.len(),
                    "resources": resource_count,
                }
            }))
            .map_err(|e| format!("JSON serialization error: {e}"))?;
            Ok(json)
        }
        _ => {
            let mut lines: Vec<String> = Vec::new();

            for d in &results {
                let severity = match d.severity {
                    LintSeverity::Error => "error",
                    LintSeverity::Warning => "warning",
                    LintSeverity::Info => "info",
                };
                lines.push(format!(
                    "{}:{} {}[{}]: {}",
                    d.resource, d.path, severity, d.rule, d.message
                ));
            }

            let count = results.len();
            let issue_word = if count == 1 { "issue" } else { "issues" };
            let resource_word = if resource_count == 1 { "resource" } else { "resources" };
            lines.push(format!(
                "{count} lint {issue_word} in {resource_count} {resource_word}."
            ));

            Ok(lines.join("\n"))
        }
    }
}
