//! Scalar and small-system root finding used by the equation-of-state layer.
//!
//! Two families are provided:
//! - Brent's method (`brent::bracket` + `brent::root`) for monotone-ish scalar
//!   residuals where a bracketing interval can be grown from a seed.
//! - Newton iteration (`newton::newton_solve`, `newton::newton_solve_2d`) for
//!   inversions where the property routine already yields its derivatives.
//!
//! Residual closures are fallible and generic over the caller's error type so
//! that physical-domain errors raised inside a residual pass through unchanged.

pub mod brent;
pub mod error;
pub mod newton;

pub use brent::{BracketConfig, BrentConfig};
pub use error::{SolverError, SolverResult};
pub use newton::{NewtonConfig, NewtonResult};
