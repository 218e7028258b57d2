//! `orca-fixed`: deterministic fixed-point arithmetic for the orca solver.
//!
//! Every other `orca-*` crate does its geometry in these types.  Nothing in
//! here touches a hardware float on the solver path, so two machines that run
//! the same sequence of operations end up with the same raw integers.
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`scalar`]  | `Fixed`: Q16.16 stored in an `i64`                       |
//! | [`vector`]  | `FixedVector2`, `FixedVector3`, `det`, `left_of`          |
//! | [`angle`]   | `FixedAngle`, `AngleScale`                                |
//! | [`trig`]    | table-driven `sin`, `cos`, `acos`                         |
//! | [`error`]   | `ArithmeticError`, `FixedResult`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` for `Fixed` (as raw `i64`) and   |
//! |         | the vector/angle types.                                    |

pub mod angle;
pub mod error;
pub mod scalar;
pub mod trig;
pub mod vector;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use angle::{AngleScale, FixedAngle};
pub use error::{ArithmeticError, FixedResult};
pub use scalar::{FRACTION_BITS, Fixed, ParseFixedError};
pub use trig::{ACOS_TABLE_SIZE, TRIG_TABLE_SIZE, acos, cos, sin};
pub use vector::{FixedVector2, FixedVector3, det, left_of};
