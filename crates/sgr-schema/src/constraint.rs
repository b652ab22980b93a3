//! # Constraint Normalization
//!
//! Turns a raw [`Constraint`] plus the owning structure's flags into the
//! effective bounds shared by the array-length check and the token
//! grammar. This is the single place where `min`/`max` defaults are
//! applied and scaled by `multiple`, so the two payload forms cannot
//! drift apart.
//!
//! ## Repetition bound
//!
//! The joined-string grammar matches one leading token (or group) plus a
//! bounded repetition of further tokens (or groups):
//!
//! - `multiple == 1`: the bound is `[min-1, max-1]` additional tokens.
//! - `multiple > 1`: tokens come in groups of `multiple`, and the bound
//!   is `[ceil((min-multiple)/multiple), ceil((max-multiple)/multiple)]`,
//!   floored at 0 (resp. 1) while the effective bound stays within two
//!   groups.

use std::fmt;

use sgr_core::{Constraint, Flag};

use crate::error::CompileError;

/// Default minimum element count when a constraint omits `min`.
pub const DEFAULT_MIN: u64 = 1;
/// Default maximum element count when a constraint omits `max`.
pub const DEFAULT_MAX: u64 = 1000;

/// Inclusive repetition bound for the grammar's trailing tokens/groups.
///
/// Displays as the regex quantifier `{min,max}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatBound {
    /// Minimum number of repetitions after the leading token/group.
    pub min: u64,
    /// Maximum number of repetitions after the leading token/group.
    pub max: u64,
}

impl fmt::Display for RepeatBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{}}}", self.min, self.max)
    }
}

/// Effective bounds and predicates derived from one raw constraint.
///
/// Never stored; recomputed on every compile call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedConstraint {
    /// Effective minimum element count (`multiple * raw_min`).
    pub min: u64,
    /// Effective maximum element count (`multiple * raw_max`).
    pub max: u64,
    /// Group size; 1 means ungrouped.
    pub multiple: u64,
    /// Elements must be pairwise distinct.
    pub is_unique: bool,
    /// The list payload may be absent.
    pub is_optional: bool,
    /// Numeric values must be non-negative.
    pub is_positive: bool,
    /// Every element carries a facet tag list.
    pub has_facets: bool,
    /// Repetition bound for the joined-string grammar.
    pub repeats: RepeatBound,
}

fn scaled(multiple: u64, count: u64) -> Result<u64, CompileError> {
    multiple
        .checked_mul(count)
        .ok_or(CompileError::BoundsOverflow { multiple, count })
}

impl NormalizedConstraint {
    /// Normalize a raw constraint under the structure-level flag list.
    ///
    /// The `max > min` sanity check is the outer document schema's job.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::BoundsOverflow`] when scaling a bound by
    /// `multiple` leaves the representable range.
    pub fn new(raw: &Constraint, flags: &[Flag]) -> Result<Self, CompileError> {
        let multiple = raw.multiple.unwrap_or(1).max(1);
        let min = scaled(multiple, raw.min.unwrap_or(DEFAULT_MIN))?;
        let max = scaled(multiple, raw.max.unwrap_or(DEFAULT_MAX))?;

        let repeats = if multiple == 1 {
            RepeatBound {
                min: min.saturating_sub(1),
                max: max.saturating_sub(1),
            }
        } else {
            let two_groups = multiple.saturating_mul(2);
            let lo = if min > two_groups {
                (min - multiple).div_ceil(multiple)
            } else {
                0
            };
            let hi = if max > two_groups {
                (max - multiple).div_ceil(multiple)
            } else {
                1
            };
            RepeatBound { min: lo, max: hi }
        };

        Ok(Self {
            min,
            max,
            multiple,
            is_unique: flags.contains(&Flag::Uniq),
            is_optional: flags.contains(&Flag::Opt),
            is_positive: flags.contains(&Flag::Pos),
            has_facets: flags.contains(&Flag::Facets),
            repeats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(min: Option<u64>, max: Option<u64>, multiple: Option<u64>) -> Constraint {
        Constraint {
            min,
            max,
            multiple,
            flags: vec![],
        }
    }

    // ---- defaults and scaling ----

    #[test]
    fn test_defaults() {
        let nc = NormalizedConstraint::new(&raw(None, None, None), &[]).unwrap();
        assert_eq!((nc.min, nc.max, nc.multiple), (1, 1000, 1));
        assert_eq!(nc.repeats, RepeatBound { min: 0, max: 999 });
    }

    #[test]
    fn test_plain_bounds() {
        let nc = NormalizedConstraint::new(&raw(Some(2), Some(5), None), &[]).unwrap();
        assert_eq!((nc.min, nc.max), (2, 5));
        assert_eq!(nc.repeats, RepeatBound { min: 1, max: 4 });
    }

    #[test]
    fn test_multiple_scales_bounds() {
        // multiple=3, min=1, max=3 → effective [3, 9]
        let nc = NormalizedConstraint::new(&raw(Some(1), Some(3), Some(3)), &[]).unwrap();
        assert_eq!((nc.min, nc.max), (3, 9));
    }

    #[test]
    fn test_multiple_default_bounds() {
        let nc = NormalizedConstraint::new(&raw(None, None, Some(4)), &[]).unwrap();
        assert_eq!((nc.min, nc.max), (4, 4000));
    }

    // ---- overflow ----

    #[test]
    fn test_scaled_bound_overflow_reported() {
        // multiple * default max (1000) leaves u64.
        let err =
            NormalizedConstraint::new(&raw(None, None, Some(100_000_000_000_000_000)), &[])
                .unwrap_err();
        assert!(matches!(
            err,
            CompileError::BoundsOverflow {
                multiple: 100_000_000_000_000_000,
                count: 1000,
            }
        ));

        let err = NormalizedConstraint::new(&raw(Some(u64::MAX), None, Some(2)), &[])
            .unwrap_err();
        assert!(matches!(err, CompileError::BoundsOverflow { .. }));
    }

    #[test]
    fn test_large_multiple_without_overflow() {
        // min = multiple fits; the two-group comparison must not wrap.
        let nc =
            NormalizedConstraint::new(&raw(Some(1), Some(2), Some(u64::MAX / 2)), &[]).unwrap();
        assert_eq!(nc.repeats, RepeatBound { min: 0, max: 1 });
    }

    // ---- repetition bound with grouping ----

    #[test]
    fn test_group_repeat_bound() {
        // multiple=3, min=1, max=3 → effective [3, 9]; one leading group,
        // then 0..=2 further groups.
        let nc = NormalizedConstraint::new(&raw(Some(1), Some(3), Some(3)), &[]).unwrap();
        assert_eq!(nc.repeats, RepeatBound { min: 0, max: 2 });
    }

    #[test]
    fn test_group_repeat_bound_collapses() {
        // multiple=3, min=1, max=2 → effective [3, 6]; both ends within
        // two groups, so the bound floors to {0,1}.
        let nc = NormalizedConstraint::new(&raw(Some(1), Some(2), Some(3)), &[]).unwrap();
        assert_eq!((nc.min, nc.max), (3, 6));
        assert_eq!(nc.repeats, RepeatBound { min: 0, max: 1 });
    }

    #[test]
    fn test_group_repeat_bound_lower_floor_only() {
        // multiple=2, min=3, max=5 → effective [6, 10]; min exceeds two
        // groups, so the lower bound engages: ceil((6-2)/2)=2, ceil((10-2)/2)=4.
        let nc = NormalizedConstraint::new(&raw(Some(3), Some(5), Some(2)), &[]).unwrap();
        assert_eq!(nc.repeats, RepeatBound { min: 2, max: 4 });
    }

    #[test]
    fn test_group_repeat_bound_min_at_two_groups_floors() {
        // multiple=2, min=2 → effective min 4, exactly two groups; the
        // lower bound stays floored at 0.
        let nc = NormalizedConstraint::new(&raw(Some(2), Some(5), Some(2)), &[]).unwrap();
        assert_eq!(nc.repeats, RepeatBound { min: 0, max: 4 });
    }

    #[test]
    fn test_repeat_bound_display() {
        assert_eq!(RepeatBound { min: 1, max: 4 }.to_string(), "{1,4}");
    }

    // ---- flags ----

    #[test]
    fn test_flag_predicates() {
        let nc = NormalizedConstraint::new(
            &raw(None, None, None),
            &[Flag::Uniq, Flag::Facets],
        )
        .unwrap();
        assert!(nc.is_unique);
        assert!(nc.has_facets);
        assert!(!nc.is_optional);
        assert!(!nc.is_positive);
    }
}
