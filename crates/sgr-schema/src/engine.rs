//! # Validator Engine Seam
//!
//! The structure compiler does not build validators directly; it calls
//! through [`ValidatorEngine`], an interface capturing "build a
//! string/number/array/object/alternation matcher with these
//! constraints". The compiler stays validation-library-agnostic; one
//! implementation per target library is enough (see
//! [`crate::matcher::JsonEngine`] for `serde_json::Value`).

use regex::Regex;

/// Constraints for a string matcher.
#[derive(Debug, Clone, Default)]
pub struct StringSpec {
    /// Minimum length in characters.
    pub min_len: Option<usize>,
    /// Maximum length in characters.
    pub max_len: Option<usize>,
    /// Exact length in characters.
    pub exact_len: Option<usize>,
    /// Anchored pattern the whole string must match.
    pub pattern: Option<Regex>,
    /// Every character must be a hexadecimal digit.
    pub hex: bool,
}

/// Constraints for a numeric matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberSpec {
    /// Require an integral value (and apply the bounds below).
    pub integer: bool,
    /// Inclusive lower bound.
    pub min: Option<i64>,
    /// Inclusive upper bound.
    pub max: Option<i64>,
}

/// Constraints for an array matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArraySpec {
    /// Minimum item count.
    pub min_items: Option<usize>,
    /// Maximum item count.
    pub max_items: Option<usize>,
    /// Items must be pairwise distinct.
    pub unique: bool,
}

/// One named field of an object matcher.
#[derive(Debug, Clone)]
pub struct Field<S> {
    /// Field name as it appears in the document.
    pub name: String,
    /// Matcher for the field's value.
    pub schema: S,
    /// Whether the field must be present.
    pub required: bool,
}

impl<S> Field<S> {
    /// A field that must be present.
    pub fn required(name: impl Into<String>, schema: S) -> Self {
        Self {
            name: name.into(),
            schema,
            required: true,
        }
    }

    /// A field that may be absent.
    pub fn optional(name: impl Into<String>, schema: S) -> Self {
        Self {
            name: name.into(),
            schema,
            required: false,
        }
    }
}

/// A named group of object fields that stand or fall together.
///
/// Used for the color models: presence of any member requires all
/// members, and at most one group may be present per object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldGroup {
    /// Group name used in error messages.
    pub name: &'static str,
    /// The member field names.
    pub members: &'static [&'static str],
}

/// Constraints for an object matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSpec {
    /// Reject keys that are not declared fields.
    pub closed: bool,
    /// Minimum number of keys present.
    pub min_properties: Option<usize>,
    /// Mutually exclusive all-or-nothing field groups.
    pub exclusive_groups: &'static [FieldGroup],
}

/// Factory for validators over one target validation library.
///
/// Implementations are stateless handles; every method is a pure
/// constructor for a schema value.
pub trait ValidatorEngine {
    /// The compiled schema type this engine produces.
    type Schema: Clone;

    /// A matcher accepting any value.
    fn any(&self) -> Self::Schema;

    /// A string matcher.
    fn string(&self, spec: StringSpec) -> Self::Schema;

    /// A numeric matcher.
    fn number(&self, spec: NumberSpec) -> Self::Schema;

    /// An array matcher with a single item schema.
    fn array(&self, spec: ArraySpec, item: Self::Schema) -> Self::Schema;

    /// An object matcher over named fields.
    fn object(&self, spec: ObjectSpec, fields: Vec<Field<Self::Schema>>) -> Self::Schema;

    /// A first-match alternation. `description` names what the
    /// alternatives are (e.g. "structures") for the exhaustion error.
    fn one_of(&self, description: &'static str, alternatives: Vec<Self::Schema>) -> Self::Schema;
}
