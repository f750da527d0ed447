use crate::CoreError;

/// Scalar type of every property and state variable.
pub type Real = f64;

/// Relative step used by every finite-difference derivative in the workspace.
pub const FD_REL_STEP: Real = 1e-6;

/// Pass `v` through if it is finite.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Perturbation size for a finite difference around `x`.
///
/// Scales with `|x|` and falls back to `rel` itself when `x` is zero.
#[inline]
pub fn fd_step(x: Real, rel: Real) -> Real {
    if x == 0.0 { rel } else { rel * x.abs() }
}

/// One-sided difference `(f(x + h) - f(x)) / h` with `h = fd_step(x, rel)`.
///
/// `fx` is the already-known value at `x`, so only one extra evaluation is made.
pub fn forward_difference<F, E>(mut f: F, x: Real, fx: Real, rel: Real) -> Result<Real, E>
where
    F: FnMut(Real) -> Result<Real, E>,
{
    let h = fd_step(x, rel);
    Ok((f(x + h)? - fx) / h)
}

/// Symmetric difference `(f(x + h) - f(x - h)) / 2h` with `h = fd_step(x, rel)`.
pub fn central_difference<F, E>(mut f: F, x: Real, rel: Real) -> Result<Real, E>
where
    F: FnMut(Real) -> Result<Real, E>,
{
    let h = fd_step(x, rel);
    Ok((f(x + h)? - f(x - h)?) / (2.0 * h))
}
