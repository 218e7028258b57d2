//! Arithmetic failures.
//!
//! Fixed-point operations never produce an infinity or NaN stand-in.  An
//! operation that has no defined result returns one of these instead, and the
//! caller propagates it with `?`.

use thiserror::Error;

use crate::{AngleScale, Fixed};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("square root of negative value {0}")]
    NegativeSquareRoot(Fixed),

    #[error("cannot combine angles in {left:?} with angles in {right:?}")]
    ScaleMismatch { left: AngleScale, right: AngleScale },
}

/// Shorthand result type for fallible fixed-point operations.
pub type FixedResult<T> = Result<T, ArithmeticError>;
