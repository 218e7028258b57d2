//! Directed lines bounding the permitted velocity half-plane.

use orca_fixed::{Fixed, FixedVector2};

/// Boundary of a half-plane of permitted velocities.
///
/// The permitted side is to the left of `direction`.  A velocity `v`
/// violates the line when `det(direction, point − v) > 0`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub point: FixedVector2,
    /// Unit length.
    pub direction: FixedVector2,
}

impl Line {
    #[inline]
    pub const fn new(point: FixedVector2, direction: FixedVector2) -> Self {
        Line { point, direction }
    }

    /// Line through the origin.
    #[inline]
    pub const fn through_origin(direction: FixedVector2) -> Self {
        Line { point: FixedVector2::ZERO, direction }
    }

    /// How far `v` lies on the forbidden side (negative when permitted).
    #[inline]
    pub fn violation(&self, v: FixedVector2) -> Fixed {
        self.direction.det(self.point - v)
    }

    #[inline]
    pub fn is_violated_by(&self, v: FixedVector2) -> bool {
        self.violation(v).is_positive()
    }
}
