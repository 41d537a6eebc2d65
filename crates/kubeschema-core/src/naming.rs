//! Conversion between schema attribute names (`snake_case`) and manifest
//! keys (`camelCase`).
//!
//! The conversion is lossy for keys containing acronym runs: `clusterIP`
//! reads back as `cluster_ip`, which converts forward to `clusterIp`. No
//! attempt is made to guess acronyms; keys like these need an entry in the
//! override table (see [`NameMapper::with_overrides`]).

use std::collections::BTreeMap;

use crate::catalogs::EXPLICIT_MAPPINGS;

/// Convert an attribute name into a manifest key using the built-in overrides.
pub fn to_manifest_key(name: &str) -> String {
    if let Some((_, key, _)) = EXPLICIT_MAPPINGS.iter().find(|(n, _, _)| *n == name) {
        return key.to_string();
    }
    camelize(name)
}

/// Convert a manifest key into an attribute name using the built-in overrides.
pub fn to_schema_name(key: &str) -> String {
    if let Some((name, _, _)) = EXPLICIT_MAPPINGS.iter().find(|(_, k, _)| *k == key) {
        return name.to_string();
    }
    snakify(key)
}

/// Convert an attribute name into a model field name (`api_version` → `APIVersion`).
pub fn to_field_name(name: &str) -> String {
    if let Some((_, _, field)) = EXPLICIT_MAPPINGS.iter().find(|(n, _, _)| *n == name) {
        return field.to_string();
    }
    capitalize(&camelize(name))
}

/// `container_port` → `containerPort`.
pub fn camelize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// `containerPort` → `container_port`, `podCIDR` → `pod_cidr`.
pub fn snakify(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_upper = false;
    for (i, ch) in key.chars().enumerate() {
        let upper = ch.is_uppercase();
        if upper && i > 0 && !prev_upper {
            out.push('_');
        }
        out.extend(ch.to_lowercase());
        prev_upper = upper;
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Built-in override table plus per-resource overrides from configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameMapper {
    /// attribute name → manifest key
    overrides: BTreeMap<String, String>,
}

impl NameMapper {
    pub fn with_overrides(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    pub fn overrides(&self) -> &BTreeMap<String, String> {
        &self.overrides
    }

    pub fn to_manifest_key(&self, name: &str) -> String {
        match self.overrides.get(name) {
            Some(key) => key.clone(),
            None => to_manifest_key(name),
        }
    }

    pub fn to_schema_name(&self, key: &str) -> String {
        match self.overrides.iter().find(|(_, k)| k.as_str() == key) {
            Some((name, _)) => name.clone(),
            None => to_schema_name(key),
        }
    }

    pub fn to_field_name(&self, name: &str) -> String {
        match self.overrides.get(name) {
            Some(key) => capitalize(key),
            None => to_field_name(name),
        }
    }

    /// True when the name has an entry in either override table.
    pub fn is_overridden(&self, name: &str) -> bool {
        self.overrides.contains_key(name) || EXPLICIT_MAPPINGS.iter().any(|(n, _, _)| *n == name)
    }
}
