use std::path::Path;

use serde_json::Value;
use tracing::warn;

use kubeschema_core::{decode_typed, flatten_response, Manifest, MetadataFilter, TypedObject};

use crate::reader::{read_config, read_document};

pub fn run_flatten(
    config_path: &Path,
    resource_name: &str,
    manifest_path: &Path,
    config_value_path: Option<&Path>,
    ignore_labels: &[String],
    ignore_annotations: &[String],
) -> Result<String, String> {
    let file = read_config(config_path)?;
    let resource = file.resource(resource_name)?;
    let derived = file.derive(resource)?;
    let options = resource.mapping_options();

    let manifest: Manifest = read_document(manifest_path)?;
    let config = match config_value_path {
        Some(path) => {
            let document: Value = read_document(path)?;
            decode_typed(&document, &derived.fields, &options)
                .map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => TypedObject::new(),
    };

    let filter = MetadataFilter::new(ignore_labels, ignore_annotations);
    let flattened = flatten_response(&manifest, &config, &derived.fields, &options, &filter)
        .map_err(|e| format!("{}: {e}", manifest_path.display()))?;

    for key in &flattened.unknown_keys {
        warn!(key = %key, "manifest key has no attribute and was dropped");
    }

    serde_json::to_string_pretty(&flattened).map_err(|e| format!("JSON serialization error: {e}"))
}
