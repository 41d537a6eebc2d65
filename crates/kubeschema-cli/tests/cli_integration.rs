use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

/// Get the workspace root (two levels up from CARGO_MANIFEST_DIR of kubeschema-cli)
fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent() // crates/
        .unwrap()
        .parent() // workspace root
        .unwrap()
        .to_path_buf()
}

fn kubeschema_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kubeschema"));
    cmd.current_dir(workspace_root());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(args: &[&str]) -> Output {
    kubeschema_bin().args(args).output().expect("failed to run")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

/// Copy the sample config and its spec files into a fresh directory.
fn sample_copy(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kubeschema-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    for file in ["generate.yaml", "config_map_v1.spec.yaml", "service_v1.spec.json"] {
        fs::copy(workspace_root().join("samples").join(file), dir.join(file)).unwrap();
    }
    dir
}

#[test]
fn cli_help() {
    let output = run(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Kubernetes resource schema generator"));
    for command in ["generate", "inspect", "expand", "flatten", "lint"] {
        assert!(stdout.contains(command), "missing {command}");
    }
}

#[test]
fn cli_version() {
    let output = run(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_generate_writes_outputs() {
    let dir = sample_copy("generate");
    let output = kubeschema_bin()
        .arg("generate")
        .arg(&dir)
        .output()
        .expect("failed to run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 resources generated, 0 warnings."));

    for file in [
        "config_map_v1_schema_gen.json",
        "config_map_v1_fields_gen.json",
        "service_v1_schema_gen.json",
        "service_v1_fields_gen.json",
        "resources_list_gen.json",
    ] {
        assert!(dir.join(file).exists(), "missing {file}");
    }

    let schema: Value =
        serde_json::from_str(&fs::read_to_string(dir.join("config_map_v1_schema_gen.json")).unwrap())
            .unwrap();
    assert_eq!(schema["resource"], "kubernetes_config_map_v1");
    assert_eq!(schema["kind"], "ConfigMap");
    assert_eq!(schema["attributes"][0]["name"], "id");
    assert_eq!(schema["attributes"][1]["name"], "metadata");
    let metadata_attrs = schema["attributes"][1]["attributes"].as_array().unwrap();
    assert!(metadata_attrs.iter().all(|a| a["name"] != "managed_fields"));

    let fields: Value =
        serde_json::from_str(&fs::read_to_string(dir.join("service_v1_fields_gen.json")).unwrap())
            .unwrap();
    let spec_fields = fields["fields"][2]["fields"].as_array().unwrap();
    assert_eq!(spec_fields[0]["manifest_key"], "clusterIP");
    assert_eq!(spec_fields[0]["field_name"], "ClusterIP");

    let list: Value =
        serde_json::from_str(&fs::read_to_string(dir.join("resources_list_gen.json")).unwrap())
            .unwrap();
    let names: Vec<_> = list["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["kubernetes_config_map_v1", "kubernetes_service_v1"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_generate_dry_run_writes_nothing() {
    let dir = sample_copy("dry-run");
    let output = kubeschema_bin()
        .args(["generate", "--dry-run"])
        .arg(dir.join("generate.yaml"))
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("would write"));
    assert!(!dir.join("config_map_v1_schema_gen.json").exists());
    assert!(!dir.join("resources_list_gen.json").exists());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_generate_derivation_error_writes_nothing() {
    let output = run(&["generate", "samples/invalid/generate.yaml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("\"metadata\" has no attributes left"));
    assert!(!workspace_root()
        .join("samples/invalid/resources_list_gen.json")
        .exists());
}

#[test]
fn cli_generate_nonexistent() {
    let output = run(&["generate", "nonexistent/path"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Path does not exist"));
}

#[test]
fn cli_inspect_human() {
    let output = run(&[
        "inspect",
        "samples/generate.yaml",
        "--resource",
        "kubernetes_service_v1",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("kubernetes_service_v1 (v1, Service)"));
    assert!(stdout.contains("  id: string [computed]"));
    assert!(stdout.contains("    namespace: string [synthetic-default]"));
    assert!(stdout.contains("    ports: list<object>"));
    assert!(stdout.contains("      port: integer [required]"));
}

#[test]
fn cli_inspect_json() {
    let output = run(&[
        "inspect",
        "samples/generate.yaml",
        "--resource",
        "kubernetes_config_map_v1",
        "--format",
        "json",
    ]);
    let derived = stdout_json(&output);
    assert_eq!(derived["schema"]["name"], "kubernetes_config_map_v1");
    assert_eq!(derived["fields"][0]["synthetic"], true);
    assert_eq!(derived["diagnostics"], json!([]));
}

#[test]
fn cli_inspect_unknown_resource() {
    let output = run(&["inspect", "samples/generate.yaml", "--resource", "nope"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Resource \"nope\" not found"));
}

#[test]
fn cli_expand() {
    let output = run(&[
        "expand",
        "samples/generate.yaml",
        "--resource",
        "kubernetes_config_map_v1",
        "samples/config_map.value.json",
    ]);
    assert_eq!(
        stdout_json(&output),
        json!({
            "metadata": {
                "name": "app-config",
                "namespace": "prod",
                "labels": {"app.kubernetes.io/name": "web"}
            },
            "data": {"LOG_LEVEL": "info", "feature_flags": "search,checkout"},
            "immutable": false
        })
    );
}

#[test]
fn cli_flatten_filters_metadata() {
    let output = run(&[
        "flatten",
        "samples/generate.yaml",
        "--resource",
        "kubernetes_config_map_v1",
        "samples/config_map.manifest.yaml",
        "--config-value",
        "samples/config_map.value.json",
        "--ignore-annotation",
        "^tmp-",
    ]);
    let flat = stdout_json(&output);
    let value = &flat["value"];
    assert_eq!(value["id"], "prod/app-config");
    assert_eq!(value["immutable"], false);
    assert_eq!(value["binary_data"], Value::Null);

    let metadata = &value["metadata"][0];
    assert_eq!(metadata["generation"], 0);
    assert_eq!(metadata["resource_version"], "48213");
    assert_eq!(metadata["labels"], json!({"app.kubernetes.io/name": "web"}));
    assert_eq!(
        metadata["annotations"],
        json!({"owner.example.com/team": "payments"})
    );
    assert_eq!(
        flat["unknown_keys"],
        json!(["apiVersion", "kind", "metadata.creationTimestamp"])
    );
}

#[test]
fn cli_flatten_acronym_override() {
    let output = run(&[
        "flatten",
        "samples/generate.yaml",
        "--resource",
        "kubernetes_service_v1",
        "samples/service.manifest.json",
    ]);
    let flat = stdout_json(&output);
    let spec = &flat["value"]["spec"];
    assert_eq!(spec["cluster_ip"], "10.96.14.2");
    assert_eq!(spec["ports"][0]["target_port"], 8080);
    assert_eq!(spec["session_affinity"], Value::Null);
    assert_eq!(flat["value"]["metadata"][0]["generation"], 1);
}

#[test]
fn cli_lint_human() {
    let output = run(&["lint", "samples/generate.yaml"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0 lint issues in 2 resources."));
}

#[test]
fn cli_lint_json() {
    let output = run(&["lint", "samples/generate.yaml", "--format", "json"]);
    let result = stdout_json(&output);
    assert!(result["diagnostics"].is_array());
    assert_eq!(result["summary"]["resources"], 2);
}
