//! Planar and spatial vectors over [`Fixed`].
//!
//! `FixedVector2` is what the solver works in.  `FixedVector3` only exists so
//! callers that keep positions in a y-up 3D frame can hand them over with
//! [`FixedVector3::horizontal`] and get results back with
//! [`FixedVector2::lift`].

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::{ArithmeticError, Fixed, FixedAngle, FixedResult, cos, sin};

// ── FixedVector2 ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedVector2 {
    pub x: Fixed,
    pub y: Fixed,
}

impl FixedVector2 {
    pub const ZERO: FixedVector2 = FixedVector2 { x: Fixed::ZERO, y: Fixed::ZERO };

    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        FixedVector2 { x, y }
    }

    /// Build from whole numbers.
    #[inline]
    pub const fn from_ints(x: i64, y: i64) -> Self {
        FixedVector2 { x: Fixed::from_int(x), y: Fixed::from_int(y) }
    }

    /// Approximate constructor for I/O and tests.
    pub fn from_f64(x: f64, y: f64) -> Self {
        FixedVector2 { x: Fixed::from_f64(x), y: Fixed::from_f64(y) }
    }

    /// Unit vector at `angle`, via the lookup tables.
    pub fn from_angle(angle: FixedAngle) -> Self {
        FixedVector2 { x: cos(angle), y: sin(angle) }
    }

    #[inline]
    pub fn dot(self, rhs: Self) -> Fixed {
        self.x * rhs.x + self.y * rhs.y
    }

    /// 2D cross product `self.x·rhs.y − self.y·rhs.x`.
    #[inline]
    pub fn det(self, rhs: Self) -> Fixed {
        self.x * rhs.y - self.y * rhs.x
    }

    #[inline]
    pub fn abs_sq(self) -> Fixed {
        self.dot(self)
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    /// Euclidean length.
    ///
    /// Computed on a copy rescaled by a power of two into `|v|² ∈ [1, 4)` so
    /// the fixed-iteration square root has converged for any input size.
    pub fn abs(self) -> FixedResult<Fixed> {
        if self.is_zero() {
            return Ok(Fixed::ZERO);
        }
        let (scaled, shift) = self.prescale();
        let length = scaled.abs_sq().sqrt()?;
        Ok(if shift >= 0 {
            Fixed::from_raw(length.raw() << shift)
        } else {
            length.shr_symmetric((-shift) as u32)
        })
    }

    /// Unit vector in the same direction.
    ///
    /// Fails with [`ArithmeticError::DivisionByZero`] on the zero vector.
    pub fn normalize(self) -> FixedResult<Self> {
        if self.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        let (scaled, _) = self.prescale();
        let length = scaled.abs_sq().sqrt()?;
        scaled.try_div(length)
    }

    /// Component-wise division by a scalar.
    pub fn try_div(self, rhs: Fixed) -> FixedResult<Self> {
        Ok(FixedVector2 { x: self.x.try_div(rhs)?, y: self.y.try_div(rhs)? })
    }

    /// Rotated a quarter turn counter-clockwise: `(-y, x)`.
    #[inline]
    pub fn perp_ccw(self) -> Self {
        FixedVector2 { x: -self.y, y: self.x }
    }

    /// Rotated a quarter turn clockwise: `(y, -x)`.
    #[inline]
    pub fn perp_cw(self) -> Self {
        FixedVector2 { x: self.y, y: -self.x }
    }

    /// Back into the 3D frame, placing the plane at `height`.
    #[inline]
    pub fn lift(self, height: Fixed) -> FixedVector3 {
        FixedVector3 { x: self.x, y: height, z: self.y }
    }

    /// Rescale by an exact power of two so that `|v|² ∈ [1, 4)`.
    ///
    /// Returns the scaled vector and the exponent `k` such that
    /// `self ≈ scaled · 2^k`.  Halving uses the sign-symmetric shift so the
    /// result is mirror-invariant.
    fn prescale(self) -> (Self, i32) {
        let mut v = self;
        let mut shift = 0i32;
        while v.abs_sq() >= Fixed::from_int(4) {
            v = FixedVector2 { x: v.x.shr_symmetric(1), y: v.y.shr_symmetric(1) };
            shift += 1;
        }
        while v.abs_sq() < Fixed::ONE {
            v = FixedVector2 {
                x: Fixed::from_raw(v.x.raw() << 1),
                y: Fixed::from_raw(v.y.raw() << 1),
            };
            shift -= 1;
        }
        (v, shift)
    }
}

/// `a.x·b.y − a.y·b.x`.
#[inline]
pub fn det(a: FixedVector2, b: FixedVector2) -> Fixed {
    a.det(b)
}

/// Signed doubled area of the triangle `a, b, c`.  Positive when `c` lies to
/// the left of the directed line `a → b`.
#[inline]
pub fn left_of(a: FixedVector2, b: FixedVector2, c: FixedVector2) -> Fixed {
    det(a - c, b - a)
}

impl Add for FixedVector2 {
    type Output = FixedVector2;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        FixedVector2 { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for FixedVector2 {
    type Output = FixedVector2;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        FixedVector2 { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Neg for FixedVector2 {
    type Output = FixedVector2;
    #[inline]
    fn neg(self) -> Self {
        FixedVector2 { x: -self.x, y: -self.y }
    }
}

impl Mul<Fixed> for FixedVector2 {
    type Output = FixedVector2;
    #[inline]
    fn mul(self, rhs: Fixed) -> Self {
        FixedVector2 { x: self.x * rhs, y: self.y * rhs }
    }
}

impl Mul<FixedVector2> for Fixed {
    type Output = FixedVector2;
    #[inline]
    fn mul(self, rhs: FixedVector2) -> FixedVector2 {
        rhs * self
    }
}

impl AddAssign for FixedVector2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for FixedVector2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl fmt::Debug for FixedVector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) raw=({}, {})", self.x, self.y, self.x.raw(), self.y.raw())
    }
}

impl fmt::Display for FixedVector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── FixedVector3 ──────────────────────────────────────────────────────────────

/// Y-up spatial vector.  The avoidance plane is `x`/`z`.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedVector3 {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
}

impl FixedVector3 {
    pub const ZERO: FixedVector3 = FixedVector3 { x: Fixed::ZERO, y: Fixed::ZERO, z: Fixed::ZERO };

    #[inline]
    pub const fn new(x: Fixed, y: Fixed, z: Fixed) -> Self {
        FixedVector3 { x, y, z }
    }

    #[inline]
    pub fn dot(self, rhs: Self) -> Fixed {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(self, rhs: Self) -> Self {
        FixedVector3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[inline]
    pub fn abs_sq(self) -> Fixed {
        self.dot(self)
    }

    /// Projection onto the avoidance plane: `(x, z)`.
    #[inline]
    pub fn horizontal(self) -> FixedVector2 {
        FixedVector2 { x: self.x, y: self.z }
    }
}

impl Add for FixedVector3 {
    type Output = FixedVector3;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        FixedVector3 { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

impl Sub for FixedVector3 {
    type Output = FixedVector3;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        FixedVector3 { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

impl Neg for FixedVector3 {
    type Output = FixedVector3;
    #[inline]
    fn neg(self) -> Self {
        FixedVector3 { x: -self.x, y: -self.y, z: -self.z }
    }
}

impl Mul<Fixed> for FixedVector3 {
    type Output = FixedVector3;
    #[inline]
    fn mul(self, rhs: Fixed) -> Self {
        FixedVector3 { x: self.x * rhs, y: self.y * rhs, z: self.z * rhs }
    }
}

impl fmt::Debug for FixedVector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
