use std::path::Path;

use serde_json::Value;

use kubeschema_core::{decode_typed, expand};

use crate::reader::{read_config, read_document};

pub fn run_expand(config_path: &Path, resource_name: &str, value_path: &Path) -> Result<String, String> {
    let file = read_config(config_path)?;
    let resource = file.resource(resource_name)?;
    let derived = file.derive(resource)?;
    let options = resource.mapping_options();

    let document: Value = read_document(value_path)?;
    let typed = decode_typed(&document, &derived.fields, &options)
        .map_err(|e| format!("{}: {e}", value_path.display()))?;
    let manifest = expand(&typed, &derived.fields, &options);

    serde_json::to_string_pretty(&manifest).map_err(|e| format!("JSON serialization error: {e}"))
}
