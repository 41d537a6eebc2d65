//! Error types for schema derivation and manifest flattening

use thiserror::Error;

/// Schema derivation failed; nothing should be generated for the resource.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DerivationError {
    #[error("attribute \"{path}\" has unsupported type \"{type_name}\"")]
    UnsupportedType { path: String, type_name: String },
    #[error("attribute \"{path}\" of type \"{type_name}\" has no element type")]
    MissingElementType { path: String, type_name: String },
    #[error("attribute \"{path}\" has unsupported element type \"{element}\"")]
    UnsupportedElementType { path: String, element: String },
    #[error("attribute \"{path}\" has no attributes left after ignored paths are removed")]
    EmptyContainer { path: String },
    #[error("duplicate attribute \"{path}\"")]
    DuplicateAttribute { path: String },
    #[error("attribute \"{path}\" maps to manifest key \"{key}\", already used by a sibling")]
    DuplicateManifestKey { path: String, key: String },
}

/// A manifest value disagrees with the kind declared by the schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeMismatchError {
    #[error("\"{path}\": expected {expected}, found {found}")]
    Mismatch {
        path: String,
        expected: String,
        found: String,
    },
    #[error("\"{path}\": expected a single-element list, found {len} elements")]
    WrapperLength { path: String, len: usize },
}

impl ShapeMismatchError {
    pub fn path(&self) -> &str {
        match self {
            ShapeMismatchError::Mismatch { path, .. } => path,
            ShapeMismatchError::WrapperLength { path, .. } => path,
        }
    }
}
