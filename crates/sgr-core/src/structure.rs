//! # Structure Descriptions
//!
//! The declarative inputs of the structure compiler: a semantic element
//! type, a dimensionality, size constraints, and behavioral flags.
//!
//! `StructureType` is a closed enum and every consumer matches it
//! exhaustively. A new semantic type is a new variant plus the match
//! arms the compiler forces you to write.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Behavioral flag attached to a structure (or an individual constraint).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flag {
    /// Array elements must be pairwise distinct.
    Uniq,
    /// The list payload may be absent.
    Opt,
    /// Every element carries a facet tag list.
    Facets,
    /// Numeric values must be non-negative.
    Pos,
}

/// The semantic element type of a structure.
///
/// Each variant fixes the per-element shape and whether the list has a
/// compact whitespace-joined string form. Multi-field and structurally
/// ambiguous elements (colors, hex runs, pairs, tuples) have no joined
/// form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureType {
    /// Array of free-form strings.
    #[serde(rename = "strings")]
    Strings,
    /// Array of color values (RGB / HSL / CMYK / hex, mutually exclusive).
    #[serde(rename = "colors")]
    Colors,
    /// Array of single characters.
    #[serde(rename = "chars")]
    Chars,
    /// Array of hexadecimal strings.
    #[serde(rename = "hex")]
    Hex,
    /// Array of integers `i`.
    #[serde(rename = "i")]
    Integers,
    /// Array of integer pairs `(i, j)`.
    #[serde(rename = "ij")]
    IntegerPairs,
    /// Array of fraction literals `x`.
    #[serde(rename = "x")]
    Fractions,
    /// Array of fraction pairs `(x, y)`.
    #[serde(rename = "xy")]
    FractionPairs,
    /// Array of fraction triples `(x, y, a)`.
    #[serde(rename = "xya")]
    FractionTriples,
    /// Array of fraction quadruples `(x, y, a, b)`.
    #[serde(rename = "xyab")]
    FractionQuads,
}

impl StructureType {
    /// All variants, in declaration order.
    pub const ALL: [StructureType; 10] = [
        StructureType::Strings,
        StructureType::Colors,
        StructureType::Chars,
        StructureType::Hex,
        StructureType::Integers,
        StructureType::IntegerPairs,
        StructureType::Fractions,
        StructureType::FractionPairs,
        StructureType::FractionTriples,
        StructureType::FractionQuads,
    ];

    /// The wire tag of this type (`"strings"`, `"ij"`, ...).
    pub fn tag(&self) -> &'static str {
        match self {
            StructureType::Strings => "strings",
            StructureType::Colors => "colors",
            StructureType::Chars => "chars",
            StructureType::Hex => "hex",
            StructureType::Integers => "i",
            StructureType::IntegerPairs => "ij",
            StructureType::Fractions => "x",
            StructureType::FractionPairs => "xy",
            StructureType::FractionTriples => "xya",
            StructureType::FractionQuads => "xyab",
        }
    }

    /// Human-readable description of the list this type produces.
    pub fn describe(&self) -> &'static str {
        match self {
            StructureType::Strings => "array of strings",
            StructureType::Colors => "array of colors",
            StructureType::Chars => "array of characters",
            StructureType::Hex => "hexadecimal string",
            StructureType::Integers => "array of integers i",
            StructureType::IntegerPairs => "array of integers (i, j)",
            StructureType::Fractions => "array of fractions x",
            StructureType::FractionPairs => "array of fractions (x, y)",
            StructureType::FractionTriples => "array of fractions (x, y, a)",
            StructureType::FractionQuads => "array of fractions (x, y, a, b)",
        }
    }

    /// Whether the list has a compact whitespace-joined string form.
    pub fn is_joinable(&self) -> bool {
        matches!(
            self,
            StructureType::Strings
                | StructureType::Chars
                | StructureType::Integers
                | StructureType::Fractions
        )
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Raw size constraint for one dimension of a structure.
///
/// Absent fields take the documented defaults (`min` 1, `max` 1000,
/// `multiple` 1) during normalization; the raw form keeps them optional
/// so a round-tripped document is unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Minimum element count before scaling by `multiple`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    /// Maximum element count before scaling by `multiple`. Must exceed
    /// the effective `min`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
    /// The element count is a multiple of this group size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple: Option<u64>,
    /// Constraint-level flags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<Flag>,
}

/// One renderable data field: type, dimensionality, constraints, flags.
///
/// Invariant: `constraints.len() == dim`. The outer document schema and
/// the compiler both enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureDescription {
    /// What this field holds, for humans.
    pub description: String,
    /// Semantic element type; selects the element schema builder.
    #[serde(rename = "type")]
    pub structure_type: StructureType,
    /// Search tags for the row.
    pub tags: Vec<String>,
    /// 1 for a flat list, 2 for a list of lists.
    #[serde(default = "default_dim")]
    pub dim: u8,
    /// One constraint per dimension.
    pub constraints: Vec<Constraint>,
    /// Structure-level flags; these drive constraint normalization.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<Flag>,
}

fn default_dim() -> u8 {
    1
}

impl StructureDescription {
    /// Whether the structure carries the given flag.
    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }
}
