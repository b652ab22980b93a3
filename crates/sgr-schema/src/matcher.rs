//! # JSON Matcher Engine
//!
//! The [`ValidatorEngine`] implementation for `serde_json::Value`
//! payloads. Schemas are a closed [`Matcher`] enum; validation is a
//! first-failure walk that reports the instance path of the first
//! violation and nothing else — one payload, one result.
//!
//! ## Check order inside objects
//!
//! unknown keys → key count → exclusivity groups → per-field
//! required/value checks. The exclusivity check runs before field value
//! checks so a color with two models is reported as a model conflict,
//! not as whichever channel happens to fail first.

use std::collections::HashSet;

use serde_json::Value;

use crate::engine::{
    ArraySpec, Field, NumberSpec, ObjectSpec, StringSpec, ValidatorEngine,
};
use crate::error::{display_path, ValidationError};

/// Stateless engine handle producing [`Matcher`] schemas.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEngine;

/// A compiled validator over `serde_json::Value`.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Accepts any value.
    Any,
    /// A constrained string.
    String(StringSpec),
    /// A constrained number.
    Number(NumberSpec),
    /// A bounded, optionally unique array of one item shape.
    Array {
        /// Size and uniqueness constraints.
        spec: ArraySpec,
        /// Matcher applied to every item.
        item: Box<Matcher>,
    },
    /// An object over named fields.
    Object {
        /// Key policy and exclusivity groups.
        spec: ObjectSpec,
        /// The declared fields.
        fields: Vec<Field<Matcher>>,
    },
    /// First-match alternation.
    OneOf {
        /// What the alternatives are, for the exhaustion error.
        description: &'static str,
        /// Candidate matchers, tried in order.
        alternatives: Vec<Matcher>,
    },
}

impl ValidatorEngine for JsonEngine {
    type Schema = Matcher;

    fn any(&self) -> Matcher {
        Matcher::Any
    }

    fn string(&self, spec: StringSpec) -> Matcher {
        Matcher::String(spec)
    }

    fn number(&self, spec: NumberSpec) -> Matcher {
        Matcher::Number(spec)
    }

    fn array(&self, spec: ArraySpec, item: Matcher) -> Matcher {
        Matcher::Array {
            spec,
            item: Box::new(item),
        }
    }

    fn object(&self, spec: ObjectSpec, fields: Vec<Field<Matcher>>) -> Matcher {
        Matcher::Object { spec, fields }
    }

    fn one_of(&self, description: &'static str, alternatives: Vec<Matcher>) -> Matcher {
        Matcher::OneOf {
            description,
            alternatives,
        }
    }
}

fn element(path: &str, message: impl Into<String>) -> ValidationError {
    ValidationError::Element {
        path: display_path(path),
        message: message.into(),
    }
}

impl Matcher {
    /// Validate a payload, reporting the first violation.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.check(value, "")
    }

    fn check(&self, value: &Value, path: &str) -> Result<(), ValidationError> {
        match self {
            Matcher::Any => Ok(()),
            Matcher::String(spec) => check_string(spec, value, path),
            Matcher::Number(spec) => check_number(spec, value, path),
            Matcher::Array { spec, item } => check_array(spec, item, value, path),
            Matcher::Object { spec, fields } => check_object(spec, fields, value, path),
            Matcher::OneOf {
                description,
                alternatives,
            } => {
                if alternatives.iter().any(|alt| alt.check(value, path).is_ok()) {
                    Ok(())
                } else {
                    Err(ValidationError::AlternationExhausted {
                        path: display_path(path),
                        description,
                    })
                }
            }
        }
    }
}

fn check_string(spec: &StringSpec, value: &Value, path: &str) -> Result<(), ValidationError> {
    let s = value
        .as_str()
        .ok_or_else(|| element(path, "must be a string"))?;
    let chars = s.chars().count();
    if let Some(n) = spec.exact_len {
        if chars != n {
            return Err(element(path, format!("length must be {n} characters long")));
        }
    }
    if let Some(n) = spec.min_len {
        if chars < n {
            return Err(element(
                path,
                format!("length must be at least {n} characters long"),
            ));
        }
    }
    if let Some(n) = spec.max_len {
        if chars > n {
            return Err(element(
                path,
                format!("length must be less than or equal to {n} characters long"),
            ));
        }
    }
    if spec.hex && (s.is_empty() || !s.bytes().all(|b| b.is_ascii_hexdigit())) {
        return Err(element(path, "must only contain hexadecimal characters"));
    }
    if let Some(pattern) = &spec.pattern {
        if !pattern.is_match(s) {
            return Err(element(path, "fails to match the required pattern"));
        }
    }
    Ok(())
}

fn check_number(spec: &NumberSpec, value: &Value, path: &str) -> Result<(), ValidationError> {
    if !spec.integer {
        return if value.is_number() {
            Ok(())
        } else {
            Err(element(path, "must be a number"))
        };
    }
    let n = value
        .as_i64()
        .ok_or_else(|| element(path, "must be an integer"))?;
    if let Some(min) = spec.min {
        if n < min {
            return Err(element(
                path,
                format!("must be larger than or equal to {min}"),
            ));
        }
    }
    if let Some(max) = spec.max {
        if n > max {
            return Err(element(
                path,
                format!("must be less than or equal to {max}"),
            ));
        }
    }
    Ok(())
}

fn check_array(
    spec: &ArraySpec,
    item: &Matcher,
    value: &Value,
    path: &str,
) -> Result<(), ValidationError> {
    let items = value
        .as_array()
        .ok_or_else(|| element(path, "must be an array"))?;
    if let Some(min) = spec.min_items {
        if items.len() < min {
            return Err(element(
                path,
                format!("must contain at least {min} items"),
            ));
        }
    }
    if let Some(max) = spec.max_items {
        if items.len() > max {
            return Err(element(
                path,
                format!("must contain less than or equal to {max} items"),
            ));
        }
    }
    if spec.unique {
        let mut seen = HashSet::with_capacity(items.len());
        for (i, v) in items.iter().enumerate() {
            if !seen.insert(v.to_string()) {
                return Err(element(
                    &format!("{path}/{i}"),
                    "contains a duplicate value",
                ));
            }
        }
    }
    for (i, v) in items.iter().enumerate() {
        item.check(v, &format!("{path}/{i}"))?;
    }
    Ok(())
}

fn check_object(
    spec: &ObjectSpec,
    fields: &[Field<Matcher>],
    value: &Value,
    path: &str,
) -> Result<(), ValidationError> {
    let map = value
        .as_object()
        .ok_or_else(|| element(path, "must be an object"))?;

    if spec.closed {
        for key in map.keys() {
            if !fields.iter().any(|f| f.name == *key) {
                return Err(element(path, format!("{key:?} is not allowed")));
            }
        }
    }
    if let Some(min) = spec.min_properties {
        if map.len() < min {
            return Err(element(
                path,
                format!("must have at least {min} keys"),
            ));
        }
    }

    let present: Vec<_> = spec
        .exclusive_groups
        .iter()
        .filter(|g| g.members.iter().any(|m| map.contains_key(*m)))
        .collect();
    if present.len() > 1 {
        return Err(element(
            path,
            format!(
                "fields from both the {} and {} groups are present; the groups are mutually exclusive",
                present[0].name, present[1].name
            ),
        ));
    }
    if let Some(group) = present.first() {
        for member in group.members {
            if !map.contains_key(*member) {
                return Err(element(
                    path,
                    format!(
                        "{member:?} is required to complete the {} group",
                        group.name
                    ),
                ));
            }
        }
    }

    for field in fields {
        match map.get(&field.name) {
            Some(v) => field.schema.check(v, &format!("{path}/{}", field.name))?,
            None if field.required => {
                return Err(element(path, format!("{:?} is required", field.name)));
            }
            None => {}
        }
    }
    Ok(())
}
