//! Generator configuration (`generate.yaml`).
//!
//! Only parsing lives here; locating and reading files is left to callers.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::catalogs::DEFAULT_SYNTHETIC_DEFAULTS;
use crate::error::DerivationError;
use crate::generator::{derive_resource, DeriveOptions, ResourceHeader};
use crate::naming::NameMapper;
use crate::types::{AttributeSpec, DerivedResource, MappingOptions, ModifierSets};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid generator config: {0}")]
    Config(#[source] serde_yaml::Error),
    #[error("invalid resource spec: {0}")]
    Spec(#[source] serde_yaml::Error),
    #[error("duplicate resource name \"{0}\"")]
    DuplicateResource(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

impl GeneratorConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = serde_yaml::from_str(content).map_err(ConfigError::Config)?;
        let mut seen = HashSet::new();
        for resource in &config.resources {
            if !seen.insert(resource.name.as_str()) {
                return Err(ConfigError::DuplicateResource(resource.name.clone()));
            }
        }
        Ok(config)
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceConfig> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Resources that are not disabled, in file order.
    pub fn enabled(&self) -> impl Iterator<Item = &ResourceConfig> {
        self.resources.iter().filter(|r| !r.disabled)
    }
}

/// One resource to generate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    pub name: String,
    pub api_version: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Path of the attribute spec file, relative to the config file.
    pub spec: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_filename_prefix: Option<String>,

    #[serde(default)]
    pub ignored_attributes: Vec<String>,
    #[serde(default)]
    pub required_attributes: Vec<String>,
    #[serde(default)]
    pub computed_attributes: Vec<String>,
    #[serde(default)]
    pub sensitive_attributes: Vec<String>,
    #[serde(default)]
    pub immutable_attributes: Vec<String>,
    #[serde(default)]
    pub default_value_attributes: Vec<String>,
    #[serde(default = "default_synthetic_defaults")]
    pub synthetic_defaults: Vec<String>,

    #[serde(default)]
    pub drop_empty_containers: bool,
    /// attribute name → manifest key, for keys the converter gets wrong.
    #[serde(default)]
    pub name_overrides: BTreeMap<String, String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub generate: GenerateConfig,
}

fn default_synthetic_defaults() -> Vec<String> {
    DEFAULT_SYNTHETIC_DEFAULTS.iter().map(|p| p.to_string()).collect()
}

/// Which outputs to write for a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateConfig {
    #[serde(default = "enabled")]
    pub schema: bool,
    #[serde(default = "enabled")]
    pub fields: bool,
}

fn enabled() -> bool {
    true
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            schema: true,
            fields: true,
        }
    }
}

impl ResourceConfig {
    pub fn output_prefix(&self) -> &str {
        self.output_filename_prefix.as_deref().unwrap_or(&self.name)
    }

    pub fn header(&self) -> ResourceHeader {
        ResourceHeader {
            name: self.name.clone(),
            api_version: self.api_version.clone(),
            kind: self.kind.clone(),
            description: self.description.clone(),
        }
    }

    pub fn modifiers(&self) -> ModifierSets {
        let set = |paths: &[String]| paths.iter().cloned().collect::<HashSet<_>>();
        ModifierSets {
            ignored: set(&self.ignored_attributes),
            required: set(&self.required_attributes),
            computed: set(&self.computed_attributes),
            sensitive: set(&self.sensitive_attributes),
            immutable: set(&self.immutable_attributes),
            default_value: set(&self.default_value_attributes),
            synthetic_defaults: set(&self.synthetic_defaults),
        }
    }

    pub fn names(&self) -> NameMapper {
        NameMapper::with_overrides(self.name_overrides.clone())
    }

    pub fn mapping_options(&self) -> MappingOptions {
        MappingOptions::with_names(self.names())
    }

    pub fn derive(&self, spec: &[AttributeSpec]) -> Result<DerivedResource, DerivationError> {
        let options = DeriveOptions {
            names: self.names(),
            drop_empty_containers: self.drop_empty_containers,
        };
        derive_resource(self.header(), spec, &self.modifiers(), &options)
    }
}

/// Parse an attribute spec document: a YAML or JSON list of attributes.
pub fn parse_spec(content: &str) -> Result<Vec<AttributeSpec>, ConfigError> {
    serde_yaml::from_str(content).map_err(ConfigError::Spec)
}
