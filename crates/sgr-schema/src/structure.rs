//! # Structure Compiler
//!
//! Composes an element builder with the array-length bound from the
//! normalized constraint and, for joinable scalar types, offers the
//! result as an alternation with the whitespace-joined string form. A
//! two-dimensional structure wraps the one-dimensional result in a
//! further length-bounded array.
//!
//! ## Design
//!
//! Both payload encodings derive their cardinality from the same
//! [`NormalizedConstraint`], so a count accepted by the array form is
//! accepted by the joined form and vice versa. The joined form is only
//! offered when the element is scalar-like and unfaceted; a faceted
//! element is an object and has no token rendering.

use tracing::debug;

use sgr_core::{Flag, StructureDescription, StructureType};

use crate::constraint::NormalizedConstraint;
use crate::element::element_schema;
use crate::engine::{ArraySpec, Field, ObjectSpec, StringSpec, ValidatorEngine};
use crate::error::CompileError;
use crate::grammar::{space_list_regex, TokenPattern};

/// Upper bound on the `title` metadata field.
const MAX_TITLE_LEN: usize = 60;
/// Upper bound on the `description` and `comment` metadata fields.
const MAX_TEXT_LEN: usize = 500;
/// Upper bound on the number of metadata tags.
const MAX_TAGS: usize = 20;
/// Upper bound on one metadata tag.
const MAX_TAG_LEN: usize = 255;

/// The joined-string validator for one structure type, or `None` when
/// the type has no joined form under this constraint.
fn joined_schema<E: ValidatorEngine>(
    engine: &E,
    structure_type: StructureType,
    nc: &NormalizedConstraint,
) -> Result<Option<E::Schema>, CompileError> {
    if !structure_type.is_joinable() || nc.has_facets {
        return Ok(None);
    }
    let schema = match structure_type {
        // Characters join with no separator, so only non-emptiness is
        // checkable at the string level.
        StructureType::Chars => engine.string(StringSpec {
            min_len: Some(1),
            ..Default::default()
        }),
        StructureType::Strings => {
            let re = space_list_regex(TokenPattern::AnyToken, nc)?;
            engine.string(StringSpec {
                pattern: Some(re),
                ..Default::default()
            })
        }
        StructureType::Integers => {
            let re = space_list_regex(
                TokenPattern::Integer {
                    positive: nc.is_positive,
                },
                nc,
            )?;
            engine.string(StringSpec {
                pattern: Some(re),
                ..Default::default()
            })
        }
        StructureType::Fractions => {
            let re = space_list_regex(
                TokenPattern::FractionLiteral {
                    positive: nc.is_positive,
                },
                nc,
            )?;
            engine.string(StringSpec {
                pattern: Some(re),
                ..Default::default()
            })
        }
        _ => return Ok(None),
    };
    Ok(Some(schema))
}

/// Length-bounded array of elements under one normalized constraint.
fn bounded_array<E: ValidatorEngine>(
    engine: &E,
    nc: &NormalizedConstraint,
    item: E::Schema,
) -> E::Schema {
    engine.array(
        ArraySpec {
            min_items: Some(nc.min as usize),
            max_items: Some(nc.max as usize),
            unique: nc.is_unique,
        },
        item,
    )
}

/// Compile the validator for a structure's `L` payload.
///
/// Fails with [`CompileError::ConstraintArity`] when the constraint
/// list does not match the declared dimensionality.
pub fn list_schema<E: ValidatorEngine>(
    engine: &E,
    description: &StructureDescription,
) -> Result<E::Schema, CompileError> {
    if description.constraints.len() != description.dim as usize {
        return Err(CompileError::ConstraintArity {
            description: description.description.clone(),
            dim: description.dim,
            found: description.constraints.len(),
        });
    }

    let nc = NormalizedConstraint::new(&description.constraints[0], &description.flags)?;
    let element = element_schema(engine, description.structure_type, &nc)?;
    let array = bounded_array(engine, &nc, element);

    let inner = match joined_schema(engine, description.structure_type, &nc)? {
        Some(joined) => engine.one_of("value forms", vec![array, joined]),
        None => array,
    };

    if description.dim < 2 {
        return Ok(inner);
    }

    // The outer array never gets a joined form: its elements are arrays
    // (or alternations), not tokens.
    let outer = NormalizedConstraint::new(&description.constraints[1], &description.flags)?;
    Ok(bounded_array(engine, &outer, inner))
}

/// Compile the full payload-object validator for one structure: the `L`
/// list plus its optional metadata fields.
pub fn structure_schema<E: ValidatorEngine>(
    engine: &E,
    description: &StructureDescription,
) -> Result<E::Schema, CompileError> {
    debug!(
        structure = %description.structure_type,
        dim = description.dim,
        "compiling structure schema"
    );

    let list = list_schema(engine, description)?;
    let list_field = if description.has_flag(Flag::Opt) {
        Field::optional("L", list)
    } else {
        Field::required("L", list)
    };

    let bounded_text = |max: usize| {
        engine.string(StringSpec {
            min_len: Some(1),
            max_len: Some(max),
            ..Default::default()
        })
    };
    let tags = engine.array(
        ArraySpec {
            max_items: Some(MAX_TAGS),
            ..Default::default()
        },
        bounded_text(MAX_TAG_LEN),
    );

    Ok(engine.object(
        ObjectSpec {
            closed: true,
            ..Default::default()
        },
        vec![
            list_field,
            Field::optional("title", bounded_text(MAX_TITLE_LEN)),
            Field::optional("description", bounded_text(MAX_TEXT_LEN)),
            Field::optional("comment", bounded_text(MAX_TEXT_LEN)),
            Field::optional("tags", tags),
        ],
    ))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::matcher::{JsonEngine, Matcher};
    use proptest::prelude::*;
    use serde_json::json;
    use sgr_core::Constraint;

    fn compiled(ty: StructureType, min: u64, max: u64) -> Matcher {
        let description = StructureDescription {
            description: format!("{ty} round trip"),
            structure_type: ty,
            tags: vec!["test".into()],
            dim: 1,
            constraints: vec![Constraint {
                min: Some(min),
                max: Some(max),
                multiple: None,
                flags: vec![],
            }],
            flags: vec![],
        };
        structure_schema(&JsonEngine, &description).unwrap()
    }

    proptest! {
        /// Any accepted integer array, re-rendered as space-joined
        /// tokens, is accepted by the joined-string alternative.
        #[test]
        fn integer_arrays_round_trip_to_joined_form(
            min in 1u64..4,
            extra in 1u64..4,
            values in proptest::collection::vec(-1000i64..1000, 1..8),
        ) {
            let m = compiled(StructureType::Integers, min, min + extra);
            if m.validate(&json!({"L": values.clone()})).is_ok() {
                let joined = values
                    .iter()
                    .map(i64::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                prop_assert!(m.validate(&json!({"L": joined})).is_ok(), "{}", joined);
            }
        }

        /// Same round trip for fraction literals.
        #[test]
        fn fraction_arrays_round_trip_to_joined_form(
            min in 1u64..4,
            extra in 1u64..4,
            parts in proptest::collection::vec((-1000i64..1000, 1i64..10), 1..8),
        ) {
            let literals: Vec<String> = parts
                .iter()
                .map(|(num, den)| format!("{num}/{den}"))
                .collect();
            let m = compiled(StructureType::Fractions, min, min + extra);
            if m.validate(&json!({"L": literals.clone()})).is_ok() {
                let joined = literals.join(" ");
                prop_assert!(m.validate(&json!({"L": joined})).is_ok(), "{}", joined);
            }
        }
    }
}
