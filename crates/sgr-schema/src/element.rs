//! # Element Schema Builders
//!
//! One builder arm per [`StructureType`], matched exhaustively. Each arm
//! produces the validator for a single list element, wrapped in the
//! facet-carrying object when the structure requests facets.
//!
//! ## Facet wrapping
//!
//! Scalar-like elements move under a type-specific payload key (`s`,
//! `c`, `H`, `i`, `x`, `col`) next to the `f` tag list. Pair and tuple
//! elements already are objects with named fields, so `f` is added
//! alongside them instead.

use regex::Regex;

use sgr_core::StructureType;

use crate::constraint::NormalizedConstraint;
use crate::engine::{
    ArraySpec, Field, FieldGroup, NumberSpec, ObjectSpec, StringSpec, ValidatorEngine,
};
use crate::error::CompileError;
use crate::grammar::{FRACTION_PATTERN, POSITIVE_FRACTION_PATTERN};

/// The mutually exclusive color models. `A`, `blur`, and `opacity`
/// belong to no group and combine with any model.
const COLOR_GROUPS: &[FieldGroup] = &[
    FieldGroup {
        name: "RGB",
        members: &["R", "G", "B"],
    },
    FieldGroup {
        name: "HSL",
        members: &["H", "S", "L"],
    },
    FieldGroup {
        name: "CMYK",
        members: &["C", "M", "Y", "K"],
    },
    FieldGroup {
        name: "hex RGB",
        members: &["RGB"],
    },
];

/// The `f` facet list: at least one non-empty tag.
fn facet_list<E: ValidatorEngine>(engine: &E) -> E::Schema {
    let tag = engine.string(StringSpec {
        min_len: Some(1),
        ..Default::default()
    });
    engine.array(
        ArraySpec {
            min_items: Some(1),
            ..Default::default()
        },
        tag,
    )
}

/// Move a scalar payload under `key` next to the facet list.
fn with_facets<E: ValidatorEngine>(engine: &E, key: &'static str, payload: E::Schema) -> E::Schema {
    engine.object(
        ObjectSpec {
            closed: true,
            ..Default::default()
        },
        vec![
            Field::required(key, payload),
            Field::required("f", facet_list(engine)),
        ],
    )
}

fn fraction_value<E: ValidatorEngine>(
    engine: &E,
    positive: bool,
) -> Result<E::Schema, CompileError> {
    let pattern = Regex::new(if positive {
        POSITIVE_FRACTION_PATTERN
    } else {
        FRACTION_PATTERN
    })?;
    Ok(engine.string(StringSpec {
        pattern: Some(pattern),
        ..Default::default()
    }))
}

fn integer_value<E: ValidatorEngine>(engine: &E, positive: bool) -> E::Schema {
    engine.number(NumberSpec {
        integer: true,
        min: positive.then_some(0),
        max: None,
    })
}

/// A color channel on the 256 scale: fraction literal or integer 0..=255.
fn channel_value<E: ValidatorEngine>(engine: &E) -> Result<E::Schema, CompileError> {
    Ok(engine.one_of(
        "channel forms",
        vec![
            fraction_value(engine, false)?,
            engine.number(NumberSpec {
                integer: true,
                min: Some(0),
                max: Some(255),
            }),
        ],
    ))
}

/// The bare color object with exclusive model groups.
fn color_value<E: ValidatorEngine>(engine: &E) -> Result<E::Schema, CompileError> {
    let mut fields = Vec::new();
    for name in ["R", "G", "B", "H", "S", "L", "A"] {
        fields.push(Field::optional(name, channel_value(engine)?));
    }
    for name in ["C", "M", "Y", "K", "blur", "opacity"] {
        fields.push(Field::optional(name, fraction_value(engine, false)?));
    }
    fields.push(Field::optional(
        "RGB",
        engine.string(StringSpec {
            exact_len: Some(6),
            hex: true,
            ..Default::default()
        }),
    ));
    Ok(engine.object(
        ObjectSpec {
            closed: true,
            exclusive_groups: COLOR_GROUPS,
            ..Default::default()
        },
        fields,
    ))
}

/// A tuple of fraction-literal fields, each independently required,
/// with `f` added alongside when the structure is faceted.
fn fraction_tuple<E: ValidatorEngine>(
    engine: &E,
    names: &'static [&'static str],
    nc: &NormalizedConstraint,
) -> Result<E::Schema, CompileError> {
    let mut fields = Vec::with_capacity(names.len() + 1);
    for name in names {
        fields.push(Field::required(*name, fraction_value(engine, false)?));
    }
    if nc.has_facets {
        fields.push(Field::required("f", facet_list(engine)));
    }
    Ok(engine.object(
        ObjectSpec {
            closed: true,
            ..Default::default()
        },
        fields,
    ))
}

/// Build the single-element validator for one structure type.
pub fn element_schema<E: ValidatorEngine>(
    engine: &E,
    structure_type: StructureType,
    nc: &NormalizedConstraint,
) -> Result<E::Schema, CompileError> {
    let schema = match structure_type {
        StructureType::Strings => {
            let s = engine.string(StringSpec {
                min_len: Some(1),
                ..Default::default()
            });
            if nc.has_facets {
                with_facets(engine, "s", s)
            } else {
                s
            }
        }
        StructureType::Chars => {
            let c = engine.string(StringSpec {
                exact_len: Some(1),
                ..Default::default()
            });
            if nc.has_facets {
                with_facets(engine, "c", c)
            } else {
                c
            }
        }
        StructureType::Hex => {
            let h = engine.string(StringSpec {
                hex: true,
                ..Default::default()
            });
            if nc.has_facets {
                with_facets(engine, "H", h)
            } else {
                h
            }
        }
        StructureType::Integers => {
            let i = integer_value(engine, nc.is_positive);
            if nc.has_facets {
                with_facets(engine, "i", i)
            } else {
                i
            }
        }
        StructureType::IntegerPairs => {
            let mut fields = vec![
                Field::required("i", integer_value(engine, nc.is_positive)),
                Field::required("j", integer_value(engine, nc.is_positive)),
            ];
            if nc.has_facets {
                fields.push(Field::required("f", facet_list(engine)));
            }
            engine.object(
                ObjectSpec {
                    closed: true,
                    ..Default::default()
                },
                fields,
            )
        }
        StructureType::Fractions => {
            let x = fraction_value(engine, nc.is_positive)?;
            if nc.has_facets {
                with_facets(engine, "x", x)
            } else {
                x
            }
        }
        StructureType::FractionPairs => fraction_tuple(engine, &["x", "y"], nc)?,
        StructureType::FractionTriples => fraction_tuple(engine, &["x", "y", "a"], nc)?,
        StructureType::FractionQuads => fraction_tuple(engine, &["x", "y", "a", "b"], nc)?,
        StructureType::Colors => {
            let col = color_value(engine)?;
            if nc.has_facets {
                with_facets(engine, "col", col)
            } else {
                col
            }
        }
    };
    Ok(schema)
}
