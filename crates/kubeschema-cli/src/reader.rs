use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::debug;

use kubeschema_core::{parse_spec, DerivedResource, GeneratorConfig, ResourceConfig};

/// `generate.yaml`, `generate_<suffix>.yaml`, `.yml` accepted.
static CONFIG_FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^generate(_.+)?\.ya?ml$").expect("valid config file pattern"));

/// A generator config with the directory its relative paths resolve against.
pub struct ConfigFile {
    pub path: PathBuf,
    pub dir: PathBuf,
    pub config: GeneratorConfig,
}

impl ConfigFile {
    pub fn resource(&self, name: &str) -> Result<&ResourceConfig, String> {
        self.config.resource(name).ok_or_else(|| {
            format!(
                "Resource \"{name}\" not found in {}",
                self.path.display()
            )
        })
    }

    /// Read the resource's attribute spec and derive its schema.
    pub fn derive(&self, resource: &ResourceConfig) -> Result<DerivedResource, String> {
        let spec_path = self.dir.join(&resource.spec);
        let content = fs::read_to_string(&spec_path)
            .map_err(|e| format!("Failed to read {}: {e}", spec_path.display()))?;
        let spec = parse_spec(&content).map_err(|e| format!("{}: {e}", spec_path.display()))?;
        resource
            .derive(&spec)
            .map_err(|e| format!("{}: resource \"{}\": {e}", self.path.display(), resource.name))
    }
}

pub fn is_config_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| CONFIG_FILE_NAME.is_match(n))
}

/// Find generator configs under a path (file or directory, searched recursively).
pub fn find_configs(input_path: &Path) -> Result<Vec<PathBuf>, String> {
    if !input_path.exists() {
        return Err(format!("Path does not exist: {}", input_path.display()));
    }

    if input_path.is_file() {
        return Ok(vec![input_path.to_path_buf()]);
    }

    let pattern = input_path.join("**/generate*.y*ml");
    let pattern_str = pattern.to_string_lossy().replace('\\', "/");
    let entries = glob::glob(&pattern_str).map_err(|e| format!("Invalid glob pattern: {e}"))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| format!("Glob error: {e}"))?;
        if is_config_file(&path) {
            debug!(path = %path.display(), "found generator config");
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(format!(
            "No generator configs (generate.yaml, generate_*.yaml) found at: {}",
            input_path.display()
        ));
    }
    Ok(paths)
}

pub fn read_config(path: &Path) -> Result<ConfigFile, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config =
        GeneratorConfig::from_yaml(&content).map_err(|e| format!("{}: {e}", path.display()))?;
    let dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(ConfigFile {
        path: path.to_path_buf(),
        dir,
        config,
    })
}

/// Read a JSON or YAML document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    serde_yaml::from_str(&content).map_err(|e| format!("Invalid document {}: {e}", path.display()))
}
