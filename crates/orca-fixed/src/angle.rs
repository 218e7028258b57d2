//! Angles tagged with the unit they are measured in.
//!
//! The sin/cos tables take radians while the acos table hands back fractions
//! of a half turn.  Keeping the unit on the value means the two can only be
//! combined after an explicit [`FixedAngle::to_radians`].

use std::fmt;

use crate::{ArithmeticError, Fixed, FixedResult};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AngleScale {
    /// Plain radians.
    Radians,
    /// Fractions of π: `1.0` is a half turn.  What `acos` returns.
    HalfTurns,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedAngle {
    pub value: Fixed,
    pub scale: AngleScale,
}

impl FixedAngle {
    pub const ZERO: FixedAngle = FixedAngle { value: Fixed::ZERO, scale: AngleScale::Radians };

    #[inline]
    pub const fn radians(value: Fixed) -> Self {
        FixedAngle { value, scale: AngleScale::Radians }
    }

    #[inline]
    pub const fn half_turns(value: Fixed) -> Self {
        FixedAngle { value, scale: AngleScale::HalfTurns }
    }

    /// The same angle in radians.
    pub fn to_radians(self) -> FixedAngle {
        match self.scale {
            AngleScale::Radians => self,
            AngleScale::HalfTurns => FixedAngle::radians(self.value * Fixed::PI),
        }
    }

    /// Radian value wrapped into `[0, 2π)`.
    pub fn wrapped_radians(self) -> Fixed {
        Fixed::from_raw(self.to_radians().value.raw().rem_euclid(Fixed::TWO_PI.raw()))
    }

    /// Sum of two angles in the same unit.
    pub fn try_add(self, rhs: FixedAngle) -> FixedResult<FixedAngle> {
        self.check_scale(rhs)?;
        Ok(FixedAngle { value: self.value + rhs.value, scale: self.scale })
    }

    /// Difference of two angles in the same unit.
    pub fn try_sub(self, rhs: FixedAngle) -> FixedResult<FixedAngle> {
        self.check_scale(rhs)?;
        Ok(FixedAngle { value: self.value - rhs.value, scale: self.scale })
    }

    fn check_scale(self, rhs: FixedAngle) -> FixedResult<()> {
        if self.scale != rhs.scale {
            return Err(ArithmeticError::ScaleMismatch { left: self.scale, right: rhs.scale });
        }
        Ok(())
    }
}

impl fmt::Display for FixedAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scale {
            AngleScale::Radians => write!(f, "{} rad", self.value),
            AngleScale::HalfTurns => write!(f, "{}π", self.value),
        }
    }
}
