//! # sgr-chunk — Chunk Options for Progressive Traversal
//!
//! The external graph-traversal engine walks a weighted graph and emits
//! chunks progressively. This crate supplies the two small pure
//! functions it is parameterized with — an exact-rational edge-weight
//! reducer and a threshold stopper — plus the pass-through traversal
//! options (start node, skip-to, max chunk size).
//!
//! ## Crate Policy
//!
//! - Depends only on `sgr-core` internally.
//! - Weight arithmetic is exact: fraction literals in, reduced fraction
//!   literals out, never floating point.
//! - Malformed weights are surfaced as [`sgr_core::FractionError`] and
//!   logged; they are never coerced to a default.

pub mod options;

pub use options::{
    Accumulated, ChunkOptions, ChunkRequest, Edge, EdgeData, EdgeVisit, Visit, DEFAULT_LIMIT,
};
