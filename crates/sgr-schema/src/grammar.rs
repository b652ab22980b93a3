//! # Token Grammar Generation
//!
//! Builds the anchored regular expression that accepts the compact
//! joined-string form of a list: whitespace-separated tokens, or
//! whitespace-separated groups of exactly `multiple` tokens when the
//! constraint groups elements.
//!
//! The repetition bound comes from the same [`NormalizedConstraint`]
//! that bounds the array form, which is what keeps the two encodings
//! accepting exactly the same cardinalities.

use regex::Regex;

use crate::constraint::NormalizedConstraint;

/// Fraction literal: optionally signed, with a denominator whose last
/// digit is 1-9. This rules out `n/0` and trailing-zero denominators
/// like `1/10` in the literal form.
pub const FRACTION_PATTERN: &str = r"^-?\d+/\d*[1-9]$";
/// Unsigned fraction literal, for positive-only structures.
pub const POSITIVE_FRACTION_PATTERN: &str = r"^\d+/\d*[1-9]$";

/// The token shape of one element in a joined string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPattern {
    /// One or more non-space characters.
    AnyToken,
    /// An integer literal, optionally signed.
    Integer {
        /// Forbid the sign entirely.
        positive: bool,
    },
    /// A fraction literal, optionally signed.
    FractionLiteral {
        /// Forbid the sign entirely.
        positive: bool,
    },
}

impl TokenPattern {
    /// The unanchored regex fragment matching one token.
    pub fn fragment(&self) -> &'static str {
        match self {
            TokenPattern::AnyToken => r"\S+",
            TokenPattern::Integer { positive: true } => r"\d+",
            TokenPattern::Integer { positive: false } => r"-?\d+",
            TokenPattern::FractionLiteral { positive: true } => r"\d+/\d*[1-9]",
            TokenPattern::FractionLiteral { positive: false } => r"[-]?\d+/\d*[1-9]",
        }
    }
}

/// Build the anchored pattern for a whitespace-joined token list.
///
/// `multiple == 1` yields `^T(\sT){lo,hi}$`; `multiple > 1` replaces the
/// unit with a run of `multiple` tokens, so the repetition counts whole
/// groups.
pub fn space_list_pattern(token: TokenPattern, nc: &NormalizedConstraint) -> String {
    let t = token.fragment();
    if nc.multiple == 1 {
        return format!(r"^{t}(\s{t}){}$", nc.repeats);
    }
    let group = vec![t; nc.multiple as usize].join(r"\s");
    format!(r"^{group}(\s{group}){}$", nc.repeats)
}

/// Compile the joined-string pattern for a constraint.
pub fn space_list_regex(
    token: TokenPattern,
    nc: &NormalizedConstraint,
) -> Result<Regex, regex::Error> {
    Regex::new(&space_list_pattern(token, nc))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use sgr_core::Constraint;

    proptest! {
        /// The ungrouped grammar accepts exactly min..=max tokens.
        #[test]
        fn ungrouped_grammar_matches_token_count(
            min in 1u64..5,
            extra in 1u64..5,
            n in 0usize..12,
        ) {
            let max = min + extra;
            let nc = NormalizedConstraint::new(
                &Constraint { min: Some(min), max: Some(max), multiple: None, flags: vec![] },
                &[],
            )
            .unwrap();
            let re = space_list_regex(TokenPattern::AnyToken, &nc).unwrap();
            let input = vec!["tok"; n].join(" ");
            let expected = n as u64 >= min && n as u64 <= max;
            prop_assert_eq!(re.is_match(&input), expected);
        }

        /// The grouped grammar accepts exactly multiples of the group size
        /// within the scaled bounds. Raw minima of 1 and 2 share a floored
        /// lower bound of one group, so the clean equivalence starts at 3.
        #[test]
        fn grouped_grammar_matches_group_count(
            min in 3u64..6,
            extra in 1u64..4,
            multiple in 2u64..5,
            n in 0usize..40,
        ) {
            let max = min + extra;
            let nc = NormalizedConstraint::new(
                &Constraint {
                    min: Some(min),
                    max: Some(max),
                    multiple: Some(multiple),
                    flags: vec![],
                },
                &[],
            )
            .unwrap();
            let re = space_list_regex(TokenPattern::AnyToken, &nc).unwrap();
            let input = vec!["tok"; n].join(" ");
            let n = n as u64;
            let expected = n % multiple == 0 && n >= nc.min && n <= nc.max;
            prop_assert_eq!(re.is_match(&input), expected);
        }
    }
}
