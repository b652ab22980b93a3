//! # Exact Fraction Arithmetic
//!
//! A signed rational number rendered as the `numerator/denominator`
//! literal used throughout rendering configurations (`"1/2"`, `"-3/4"`).
//!
//! ## Invariants
//!
//! - The denominator is always positive; the numerator carries the sign.
//! - The pair is reduced by GCD at construction, so two fractions are
//!   equal exactly when their literals are equal.
//! - All arithmetic is exact. Multiplication goes through `i128`
//!   intermediates and reports overflow instead of wrapping or rounding.
//!
//! ## Parsing
//!
//! `Fraction::parse` accepts `-?digits/digits` with a non-zero
//! denominator. Anything else — floats, bare integers, empty parts,
//! embedded signs — is a [`FractionError::Parse`]. Parse failure is a
//! hard error for the operation that needed the value; there is no
//! silent fallback.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error constructing or combining a [`Fraction`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FractionError {
    /// The input is not a `numerator/denominator` literal.
    #[error("not a fraction literal: {0:?}")]
    Parse(String),

    /// The denominator is zero.
    #[error("fraction denominator must be non-zero: {0:?}")]
    ZeroDenominator(String),

    /// The exact result does not fit the internal representation.
    #[error("fraction arithmetic overflow")]
    Overflow,
}

/// An exact rational number: `i64` numerator over a positive `i64`
/// denominator, reduced by GCD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    num: i64,
    den: i64,
}

impl Fraction {
    /// The multiplicative identity, rendered as `"1/1"`.
    pub const ONE: Fraction = Fraction { num: 1, den: 1 };

    /// Build a reduced fraction from a numerator and denominator.
    ///
    /// # Errors
    ///
    /// Returns [`FractionError::ZeroDenominator`] when `den == 0` and
    /// [`FractionError::Overflow`] when sign normalization of
    /// `i64::MIN` cannot be represented.
    pub fn new(num: i64, den: i64) -> Result<Self, FractionError> {
        if den == 0 {
            return Err(FractionError::ZeroDenominator(format!("{num}/{den}")));
        }
        let (num, den) = if den < 0 {
            (
                num.checked_neg().ok_or(FractionError::Overflow)?,
                den.checked_neg().ok_or(FractionError::Overflow)?,
            )
        } else {
            (num, den)
        };
        let g = gcd(num.unsigned_abs(), den.unsigned_abs());
        if g <= 1 {
            return Ok(Self { num, den });
        }
        // g divides both operands, so the divisions are exact and in range.
        Ok(Self {
            num: num / g as i64,
            den: den / g as i64,
        })
    }

    /// Parse a fraction literal of the form `-?digits/digits`.
    ///
    /// # Errors
    ///
    /// Returns [`FractionError::Parse`] for anything that is not a
    /// fraction literal (including values too large for `i64`), and
    /// [`FractionError::ZeroDenominator`] for `n/0`.
    pub fn parse(input: &str) -> Result<Self, FractionError> {
        let (num_part, den_part) = input
            .split_once('/')
            .ok_or_else(|| FractionError::Parse(input.to_string()))?;

        let digits = num_part.strip_prefix('-').unwrap_or(num_part);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FractionError::Parse(input.to_string()));
        }
        if den_part.is_empty() || !den_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FractionError::Parse(input.to_string()));
        }

        let num: i64 = num_part
            .parse()
            .map_err(|_| FractionError::Parse(input.to_string()))?;
        let den: i64 = den_part
            .parse()
            .map_err(|_| FractionError::Parse(input.to_string()))?;
        if den == 0 {
            return Err(FractionError::ZeroDenominator(input.to_string()));
        }
        Self::new(num, den)
    }

    /// The reduced numerator (sign carrier).
    pub fn numerator(&self) -> i64 {
        self.num
    }

    /// The reduced, always-positive denominator.
    pub fn denominator(&self) -> i64 {
        self.den
    }

    /// Exact product of two fractions.
    ///
    /// Intermediates are `i128`, and the result is reduced before the
    /// range check, so products whose reduced form fits `i64` succeed
    /// even when the raw cross products would not.
    ///
    /// # Errors
    ///
    /// Returns [`FractionError::Overflow`] when the reduced result does
    /// not fit the internal representation.
    pub fn checked_mul(self, rhs: Fraction) -> Result<Self, FractionError> {
        let num = i128::from(self.num) * i128::from(rhs.num);
        let den = i128::from(self.den) * i128::from(rhs.den);
        let g = gcd128(num.unsigned_abs(), den.unsigned_abs());
        let (num, den) = if g <= 1 {
            (num, den)
        } else {
            (num / g as i128, den / g as i128)
        };
        let num = i64::try_from(num).map_err(|_| FractionError::Overflow)?;
        let den = i64::try_from(den).map_err(|_| FractionError::Overflow)?;
        // Already reduced and den > 0; new() only re-checks.
        Self::new(num, den)
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive, so cross-multiplication preserves order.
        let lhs = i128::from(self.num) * i128::from(other.den);
        let rhs = i128::from(other.num) * i128::from(self.den);
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl FromStr for Fraction {
    type Err = FractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Fraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fraction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let literal = String::deserialize(deserializer)?;
        Fraction::parse(&literal).map_err(D::Error::custom)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn gcd128(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
