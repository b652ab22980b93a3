//! # Error Types
//!
//! Two families: compile-time errors (the description itself is
//! unusable) and validation errors (a payload does not conform).
//! Validation reports the FIRST failure with its instance path — one
//! document, one result, nothing collected and nothing retried.

use thiserror::Error;

/// Error compiling a structure description into a validator.
#[derive(Error, Debug)]
pub enum CompileError {
    /// The description's constraint list does not match its `dim`.
    #[error("structure {description:?} declares dim {dim} but provides {found} constraints")]
    ConstraintArity {
        /// The structure's own description text.
        description: String,
        /// Declared dimensionality.
        dim: u8,
        /// Number of constraints actually provided.
        found: usize,
    },

    /// Scaling a constraint bound by `multiple` left the representable
    /// range.
    #[error("constraint bounds overflow: {multiple} * {count} exceeds the representable range")]
    BoundsOverflow {
        /// The group size doing the scaling.
        multiple: u64,
        /// The raw bound being scaled.
        count: u64,
    },

    /// A generated token grammar failed to compile.
    #[error("generated pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),

    /// The embedded document schema failed to build.
    #[error("document schema failed to build: {0}")]
    Schema(String),
}

/// Error validating a value against a compiled schema.
///
/// `path` is a JSON-Pointer-style location in the offending document;
/// the root is rendered as `(root)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The top-level plugin/native document fails the outer schema.
    #[error("configuration shape error at {path}: {message}")]
    ConfigShape {
        /// Location of the first violation.
        path: String,
        /// Human-readable description of the violated rule.
        message: String,
    },

    /// A payload element fails its compiled per-type schema.
    #[error("invalid element at {path}: {message}")]
    Element {
        /// Location of the first violation.
        path: String,
        /// Human-readable description of the violated rule.
        message: String,
    },

    /// A value matches none of the alternatives offered at this point.
    #[error("value at {path} matches none of the allowed {description}")]
    AlternationExhausted {
        /// Location of the value.
        path: String,
        /// What the alternatives were (e.g. "structures", "value forms").
        description: &'static str,
    },
}

impl ValidationError {
    /// The instance path of the first violation.
    pub fn path(&self) -> &str {
        match self {
            ValidationError::ConfigShape { path, .. }
            | ValidationError::Element { path, .. }
            | ValidationError::AlternationExhausted { path, .. } => path,
        }
    }
}

/// Render an instance path for error reporting; the document root is
/// shown as `(root)`.
pub(crate) fn display_path(path: &str) -> String {
    if path.is_empty() {
        "(root)".to_string()
    } else {
        path.to_string()
    }
}
