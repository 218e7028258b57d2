//! Table-driven trigonometry.
//!
//! The tables are filled on first use from a Taylor series evaluated in
//! [`Fixed`] arithmetic, so their contents are the same raw integers on every
//! platform.  No libm call is involved.
//!
//! * sin/cos: [`TRIG_TABLE_SIZE`] samples, entry `k` at `2π·k/(N−1)`.
//!   Lookup wraps the angle into `[0, 2π)` and takes index
//!   `round(t·(N−1))` with `t = θ / 2π`.
//! * acos: [`ACOS_TABLE_SIZE`] samples over `[−1, 1]`, values in half turns.

use std::sync::LazyLock;

use crate::{Fixed, FixedAngle};

pub const TRIG_TABLE_SIZE: usize = 1024;
pub const ACOS_TABLE_SIZE: usize = 512;

/// Taylor terms after the constant one.  Enough for |x| ≤ π/2.
const TAYLOR_TERMS: i64 = 8;

static COS_TABLE: LazyLock<Vec<Fixed>> =
    LazyLock::new(|| (0..TRIG_TABLE_SIZE).map(|k| cos_exact(table_angle(k))).collect());

static SIN_TABLE: LazyLock<Vec<Fixed>> = LazyLock::new(|| {
    (0..TRIG_TABLE_SIZE)
        .map(|k| {
            let shifted = (table_angle(k) - Fixed::HALF_PI).raw().rem_euclid(Fixed::TWO_PI.raw());
            cos_exact(Fixed::from_raw(shifted))
        })
        .collect()
});

static ACOS_TABLE: LazyLock<Vec<Fixed>> = LazyLock::new(|| {
    let last = (ACOS_TABLE_SIZE - 1) as i64;
    (0..ACOS_TABLE_SIZE as i64)
        .map(|j| {
            let x = Fixed::from_raw(-Fixed::ONE.raw() + 2 * Fixed::ONE.raw() * j / last);
            let theta = acos_exact(x);
            // θ / π in half turns; π is a non-zero constant.
            Fixed::from_raw((((theta.raw() as i128) << 16) / Fixed::PI.raw() as i128) as i64)
        })
        .collect()
});

// ── Lookups ───────────────────────────────────────────────────────────────────

/// Cosine of `angle` (any scale).
pub fn cos(angle: FixedAngle) -> Fixed {
    COS_TABLE[trig_index(angle)]
}

/// Sine of `angle` (any scale).
pub fn sin(angle: FixedAngle) -> Fixed {
    SIN_TABLE[trig_index(angle)]
}

/// Arc cosine.  `x` is clamped into `[−1, 1]`; the result is tagged
/// [`AngleScale::HalfTurns`](crate::AngleScale::HalfTurns).
pub fn acos(x: Fixed) -> FixedAngle {
    let one = Fixed::ONE.raw() as i128;
    let x = x.clamp(-Fixed::ONE, Fixed::ONE).raw() as i128;
    let last = (ACOS_TABLE_SIZE - 1) as i128;
    let index = ((x + one) * last + one) / (2 * one);
    FixedAngle::half_turns(ACOS_TABLE[index as usize])
}

fn trig_index(angle: FixedAngle) -> usize {
    let two_pi = Fixed::TWO_PI.raw() as i128;
    let wrapped = angle.wrapped_radians().raw() as i128;
    let index = (wrapped * (TRIG_TABLE_SIZE as i128 - 1) + two_pi / 2) / two_pi;
    index as usize
}

// ── Table generation ──────────────────────────────────────────────────────────

fn table_angle(k: usize) -> Fixed {
    Fixed::from_raw(Fixed::TWO_PI.raw() * k as i64 / (TRIG_TABLE_SIZE as i64 - 1))
}

/// Truncating division by a small positive integer.
fn div_int(value: Fixed, divisor: i64) -> Fixed {
    Fixed::from_raw(value.raw() / divisor)
}

/// Maclaurin series for cos, valid for `|x| ≤ π/2`.
fn cos_series(x: Fixed) -> Fixed {
    let x2 = x * x;
    let mut term = Fixed::ONE;
    let mut sum = Fixed::ONE;
    for n in 1..=TAYLOR_TERMS {
        term = -div_int(term * x2, (2 * n - 1) * (2 * n));
        sum += term;
    }
    sum
}

/// cos for `θ ∈ [0, 2π]`, folded into the series' range by symmetry.
fn cos_exact(theta: Fixed) -> Fixed {
    let mut a = theta;
    if a > Fixed::PI {
        a = Fixed::TWO_PI - a;
    }
    if a > Fixed::HALF_PI { -cos_series(Fixed::PI - a) } else { cos_series(a) }
}

/// acos in radians.  Negative inputs use `acos(x) = π − acos(−x)`: the series
/// cosine is flat at ±1 within about 1/256 of 0 and π, and bisecting against
/// the upper plateau would stop short of π.
fn acos_exact(x: Fixed) -> Fixed {
    if x.is_negative() { Fixed::PI - acos_non_negative(-x) } else { acos_non_negative(x) }
}

/// Bisection on the monotone series cosine over `[0, π/2]`, for `x ≥ 0`.
fn acos_non_negative(x: Fixed) -> Fixed {
    let mut lo = 0i64;
    let mut hi = Fixed::HALF_PI.raw();
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if cos_exact(Fixed::from_raw(mid)) > x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Fixed::from_raw(lo)
}
