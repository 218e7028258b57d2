//! The `Fixed` scalar: Q16.16 stored in an `i64`.
//!
//! # Representation
//!
//! ```text
//! real value = raw / 2^16
//! ```
//!
//! The upper 48 bits hold the integer part, the lower 16 the fraction, so the
//! resolution is 1/65536 ≈ 1.5e-5.  Ordering, equality and hashing are derived
//! on the raw integer; there is no float anywhere in the comparison path.
//!
//! Products and quotients are formed in `i128` and narrowed back, so the only
//! rounding that happens is the documented one: multiplication truncates the
//! magnitude (sign-symmetric), division truncates toward zero.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use thiserror::Error;

use crate::{ArithmeticError, FixedResult};

/// Number of fractional bits.
pub const FRACTION_BITS: u32 = 16;

const SCALE: i64 = 1 << FRACTION_BITS;

/// Fixed Newton–Raphson iteration budget for [`Fixed::sqrt`].
const SQRT_ITERATIONS: usize = 10;

/// A deterministic Q16.16 fixed-point number.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Fixed(i64);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(SCALE);
    pub const TWO: Fixed = Fixed(2 * SCALE);
    pub const HALF: Fixed = Fixed(SCALE / 2);

    /// Tolerance used by the geometric predicates (parallel lines, "already
    /// covered" checks).  16 raw units ≈ 2.4e-4.
    pub const EPSILON: Fixed = Fixed(16);

    /// Smallest positive step.
    pub const DELTA: Fixed = Fixed(1);

    pub const MAX: Fixed = Fixed(i64::MAX);
    pub const MIN: Fixed = Fixed(i64::MIN);

    /// π rounded to the nearest raw unit (205887.4 → 205887).
    pub const PI: Fixed = Fixed(205_887);
    /// 2π rounded to the nearest raw unit.
    pub const TWO_PI: Fixed = Fixed(411_775);
    /// π/2 rounded to the nearest raw unit.
    pub const HALF_PI: Fixed = Fixed(102_944);

    // ── Construction ──────────────────────────────────────────────────────

    /// Wrap a raw scaled integer.
    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Fixed(raw)
    }

    /// The raw scaled integer.  This is the value that must match across
    /// machines.
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Convert a whole number.
    #[inline]
    pub const fn from_int(n: i64) -> Self {
        Fixed(n * SCALE)
    }

    /// `numerator / denominator` as a fixed-point value.
    pub fn from_ratio(numerator: i64, denominator: i64) -> FixedResult<Self> {
        Fixed::from_int(numerator).try_div(Fixed::from_int(denominator))
    }

    /// Nearest fixed-point value to `x`.
    ///
    /// For I/O and tests only.  Nothing on the solver path calls this.
    pub fn from_f64(x: f64) -> Self {
        Fixed((x * SCALE as f64).round() as i64)
    }

    /// Approximate `f64` value, for display and plotting.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    /// Integer part, truncated toward zero.
    #[inline]
    pub fn to_int(self) -> i64 {
        if self.0 < 0 { -((-self.0) >> FRACTION_BITS) } else { self.0 >> FRACTION_BITS }
    }

    // ── Predicates ────────────────────────────────────────────────────────

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    // ── Arithmetic ────────────────────────────────────────────────────────

    #[inline]
    pub fn abs(self) -> Self {
        Fixed(self.0.abs())
    }

    /// `-1`, `0` or `1` as a fixed-point value.
    #[inline]
    pub fn signum(self) -> Self {
        Fixed(self.0.signum() * SCALE)
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        if other < self { other } else { self }
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        if other > self { other } else { self }
    }

    /// Clamp into `[lo, hi]`.  Callers guarantee `lo <= hi`.
    #[inline]
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        debug_assert!(lo <= hi);
        self.max(lo).min(hi)
    }

    /// Divide, truncating toward zero.
    ///
    /// The dividend is shifted left by 16 bits before the integer division.
    /// A zero divisor is an error, never an infinity.
    pub fn try_div(self, rhs: Self) -> FixedResult<Self> {
        if rhs.0 == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        let quotient = ((self.0 as i128) << FRACTION_BITS) / rhs.0 as i128;
        Ok(Fixed(quotient as i64))
    }

    /// `1 / self`.
    pub fn recip(self) -> FixedResult<Self> {
        Fixed::ONE.try_div(self)
    }

    /// Shift the magnitude right by `bits`, keeping the sign.
    ///
    /// Unlike `>>` on the raw value this rounds toward zero for negative
    /// inputs, so `x.shr_symmetric(n) == -(-x).shr_symmetric(n)`.
    #[inline]
    pub fn shr_symmetric(self, bits: u32) -> Self {
        if self.0 < 0 { Fixed(-((-self.0) >> bits)) } else { Fixed(self.0 >> bits) }
    }

    /// Square root by Newton–Raphson.
    ///
    /// Seeded at the input value and run for at most ten iterations, stopping
    /// early once the iterate stops changing.  The iteration count is part of
    /// the determinism contract and must not depend on the input.
    pub fn sqrt(self) -> FixedResult<Self> {
        if self.0 < 0 {
            return Err(ArithmeticError::NegativeSquareRoot(self));
        }
        if self.0 == 0 {
            return Ok(Fixed::ZERO);
        }

        let mut estimate = self;
        for _ in 0..SQRT_ITERATIONS {
            let next = Fixed((estimate + self.try_div(estimate)?).0 / 2);
            if next == estimate {
                break;
            }
            estimate = next;
        }
        Ok(estimate)
    }

    /// [`sqrt`](Self::sqrt) for inputs of any size.
    ///
    /// The input is rescaled by an exact power of four into `[1, 4)`, where
    /// the fixed ten iterations have converged, and the root is scaled back
    /// by the matching power of two.
    pub fn sqrt_scaled(self) -> FixedResult<Self> {
        if self.0 <= 0 {
            return self.sqrt();
        }
        let four = 4 * SCALE;
        let mut x = self.0;
        let mut shift = 0i32;
        while x >= four {
            x >>= 2;
            shift += 1;
        }
        while x < SCALE {
            x <<= 2;
            shift -= 1;
        }
        let root = Fixed(x).sqrt()?;
        Ok(if shift >= 0 { Fixed(root.0 << shift) } else { root.shr_symmetric((-shift) as u32) })
    }
}

// ── Operators ─────────────────────────────────────────────────────────────────

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 + rhs.0)
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 - rhs.0)
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline]
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

impl Mul for Fixed {
    type Output = Fixed;

    /// Multiply in `i128`, then shift the magnitude right by 16.
    ///
    /// Negative products are negated, shifted and negated back so that
    /// `a * b == -((-a) * b)` holds bit for bit.
    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        let product = self.0 as i128 * rhs.0 as i128;
        let shifted = if product < 0 {
            -((-product) >> FRACTION_BITS)
        } else {
            product >> FRACTION_BITS
        };
        Fixed(shifted as i64)
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        self.0 -= rhs.0;
    }
}

impl MulAssign for Fixed {
    #[inline]
    fn mul_assign(&mut self, rhs: Fixed) {
        *self = *self * rhs;
    }
}

impl From<i32> for Fixed {
    fn from(n: i32) -> Fixed {
        Fixed::from_int(n as i64)
    }
}

// ── Formatting ────────────────────────────────────────────────────────────────

impl fmt::Display for Fixed {
    /// Decimal rendering computed from the raw integer.  Honours `{:.N}`
    /// (default 5 digits).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = f.precision().unwrap_or(5).min(18) as u32;
        let negative = self.0 < 0;
        let magnitude = self.0.unsigned_abs() as u128;

        let pow = 10u128.pow(digits);
        let mut whole = magnitude >> FRACTION_BITS;
        let frac_bits = magnitude & (SCALE as u128 - 1);
        let mut frac = (frac_bits * pow + (SCALE as u128 / 2)) >> FRACTION_BITS;
        if frac >= pow {
            whole += 1;
            frac -= pow;
        }

        let sign = if negative && (whole != 0 || frac != 0) { "-" } else { "" };
        if digits == 0 {
            write!(f, "{sign}{whole}")
        } else {
            write!(f, "{sign}{whole}.{frac:0width$}", width = digits as usize)
        }
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({} raw={})", self, self.0)
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Error returned when a decimal string cannot be read as a [`Fixed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid fixed-point literal {0:?}")]
pub struct ParseFixedError(pub String);

impl FromStr for Fixed {
    type Err = ParseFixedError;

    /// Parse `[-+]digits[.digits]` with integer arithmetic only, rounding the
    /// fraction to the nearest raw unit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseFixedError(s.to_owned());
        let trimmed = s.trim();
        let (negative, body) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (whole_str, frac_str) = match body.split_once('.') {
            Some((w, fr)) => (w, fr),
            None => (body, ""),
        };
        if whole_str.is_empty() && frac_str.is_empty() {
            return Err(err());
        }
        if !whole_str.bytes().all(|b| b.is_ascii_digit())
            || !frac_str.bytes().all(|b| b.is_ascii_digit())
            || frac_str.len() > 18
        {
            return Err(err());
        }

        let whole: i128 = if whole_str.is_empty() { 0 } else { whole_str.parse().map_err(|_| err())? };
        let frac_raw: i128 = if frac_str.is_empty() {
            0
        } else {
            let numerator: i128 = frac_str.parse().map_err(|_| err())?;
            let pow = 10i128.pow(frac_str.len() as u32);
            (numerator * SCALE as i128 + pow / 2) / pow
        };

        let magnitude = (whole << FRACTION_BITS) + frac_raw;
        let raw = if negative { -magnitude } else { magnitude };
        i64::try_from(raw).map(Fixed).map_err(|_| err())
    }
}
