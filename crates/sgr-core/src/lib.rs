//! # sgr-core — Foundational Types for the Rendering Stack
//!
//! This crate is the leaf of the workspace DAG. It defines the domain
//! primitives shared by the structure compiler and the traversal chunk
//! builder; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Exact arithmetic for edge weights.** [`Fraction`] is a signed,
//!    GCD-reduced rational. Weight accumulation over arbitrarily long
//!    traversal paths never touches floating point, so repeated
//!    multiplication cannot drift.
//!
//! 2. **Closed `StructureType` enum.** One definition, ten variants,
//!    exhaustive `match` everywhere. Adding a semantic type forces every
//!    consumer to handle it — there is no string-keyed builder lookup
//!    that can fail at runtime.
//!
//! 3. **Parse, don't coerce.** `Fraction::parse` rejects anything that is
//!    not a fraction literal with a structured error. No silent defaults.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sgr-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Public types derive `Debug` and `Clone`, and implement
//!   `Serialize`/`Deserialize` where they cross a document boundary.

pub mod fraction;
pub mod structure;

// Re-export primary types for ergonomic imports.
pub use fraction::{Fraction, FractionError};
pub use structure::{Constraint, Flag, StructureDescription, StructureType};
