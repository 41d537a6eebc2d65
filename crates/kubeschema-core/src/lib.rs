pub mod catalogs;
pub mod config;
pub mod error;
pub mod expand;
pub mod flatten;
pub mod generator;
pub mod metadata;
pub mod naming;
pub mod resource_id;
pub mod types;
pub mod value;

pub use catalogs::GENERATOR_VERSION;
pub use config::{parse_spec, ConfigError, GenerateConfig, GeneratorConfig, ResourceConfig};
pub use error::{DerivationError, ShapeMismatchError};
pub use expand::expand;
pub use flatten::{decode_typed, flatten, flatten_response, Flattened};
pub use generator::{derive_resource, DeriveOptions, ResourceHeader};
pub use metadata::{is_internal_key, MetadataFilter};
pub use naming::{to_field_name, to_manifest_key, to_schema_name, NameMapper};
pub use resource_id::{create_id, parse_id};
pub use types::*;
pub use value::{Manifest, TypedObject, TypedValue};
