//! # sgr-schema — Structure-Description Compiler
//!
//! Compiles declarative structure descriptions into concrete data
//! validators for the spatial graph rendering configuration format.
//!
//! ## Pipeline
//!
//! Raw descriptions flow one direction:
//!
//! 1. [`constraint`] normalizes a raw size constraint plus the owning
//!    structure's flags into effective bounds and predicates.
//! 2. [`grammar`] derives the anchored regex for the whitespace-joined
//!    string form from the same bounds.
//! 3. [`element`] builds the per-item validator for each semantic type,
//!    wrapping it in the facet object when requested.
//! 4. [`structure`] composes element, array bounds, and (for joinable
//!    types) the joined-form alternation; recurses once for `dim == 2`.
//! 5. [`native`] and [`config`] assemble per-native validator maps and
//!    validate the outer plugin/native document.
//!
//! ## Engine Seam
//!
//! The compiler never constructs validators directly: it calls through
//! the [`engine::ValidatorEngine`] trait, and [`matcher::JsonEngine`]
//! implements it for `serde_json::Value` payloads. The two payload
//! encodings (array and joined string) share one normalized constraint,
//! which is what keeps their accepted cardinalities identical.
//!
//! ## Crate Policy
//!
//! - Depends only on `sgr-core` internally.
//! - Everything is pure and synchronous: no I/O, no shared mutable
//!   state, compile as many descriptions in parallel as you like.
//! - Validation reports the first failure with its instance path.

pub mod config;
pub mod constraint;
pub mod element;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod matcher;
pub mod native;
pub mod structure;

pub use config::{Build, Configuration, DocumentValidator, KeyRegexes, Validators};
pub use constraint::NormalizedConstraint;
pub use engine::ValidatorEngine;
pub use error::{CompileError, ValidationError};
pub use matcher::{JsonEngine, Matcher};
pub use native::NativeSchemas;
pub use structure::{list_schema, structure_schema};
