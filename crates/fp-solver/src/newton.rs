//! Newton inversions for property relations that supply their own derivatives.

use crate::error::SolverError;
use fp_core::{Real, ensure_finite};
use nalgebra::{Matrix2, Vector2};

/// Newton solver configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewtonConfig {
    /// Relative residual tolerance (absolute when the target is ~0)
    pub tolerance: Real,
    /// Maximum iterations
    pub max_iterations: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 100,
        }
    }
}

/// Newton iteration result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonResult<X> {
    /// Solution
    pub x: X,
    /// Number of iterations taken
    pub iterations: usize,
}

fn residual_converged(residual: Real, target: Real, tolerance: Real) -> bool {
    if target.abs() <= tolerance {
        residual.abs() < tolerance
    } else {
        (residual / target).abs() < tolerance
    }
}

/// Solve `y(z) = target` for `z` starting from `z0`.
///
/// `f` returns `(y, dy/dz)` at the requested `z`. At least one update is always
/// applied, so the returned `x` has been refined past the evaluation that met
/// the tolerance.
///
/// # Errors
/// * `SolverError::Numeric` if `z0` is not finite
/// * `SolverError::Convergence` on a zero derivative, a NaN iterate, or when
///   `config.max_iterations` is exhausted
/// * any error returned by `f`
pub fn newton_solve<F, E>(
    target: Real,
    z0: Real,
    mut f: F,
    config: &NewtonConfig,
) -> Result<NewtonResult<Real>, E>
where
    F: FnMut(Real) -> Result<(Real, Real), E>,
    E: From<SolverError>,
{
    let mut z = ensure_finite(z0, "newton initial guess").map_err(SolverError::from)?;

    for iteration in 0..config.max_iterations {
        let (y, dy_dz) = f(z)?;
        let residual = y - target;
        let converged = residual_converged(residual, target, config.tolerance);

        if dy_dz == 0.0 {
            return Err(SolverError::convergence(format!(
                "Zero derivative in Newton solve at z = {z}"
            ))
            .into());
        }
        z -= residual / dy_dz;
        tracing::trace!(iteration, z, residual, "newton step");

        if converged {
            tracing::debug!(x = z, iterations = iteration + 1, "newton converged");
            return Ok(NewtonResult {
                x: z,
                iterations: iteration + 1,
            });
        }
        if z.is_nan() {
            return Err(SolverError::convergence("NaN detected in Newton solve").into());
        }
    }

    Err(SolverError::convergence(format!(
        "Newton solve convergence failed: maximum number of iterations, {}, exceeded",
        config.max_iterations
    ))
    .into())
}

/// Solve the 2×2 system `y(z) = targets` starting from `z0`.
///
/// `f` returns the two function values and their Jacobian
/// `J[(i, j)] = ∂y_i/∂z_j`. Converges when both residuals satisfy the scalar
/// criterion of [`newton_solve`].
///
/// # Errors
/// * `SolverError::Numeric` if `z0` is not finite
/// * `SolverError::Convergence` on a singular Jacobian, a NaN iterate, or when
///   `config.max_iterations` is exhausted
/// * any error returned by `f`
pub fn newton_solve_2d<F, E>(
    targets: Vector2<Real>,
    z0: Vector2<Real>,
    mut f: F,
    config: &NewtonConfig,
) -> Result<NewtonResult<Vector2<Real>>, E>
where
    F: FnMut(&Vector2<Real>) -> Result<(Vector2<Real>, Matrix2<Real>), E>,
    E: From<SolverError>,
{
    ensure_finite(z0[0], "newton initial guess").map_err(SolverError::from)?;
    ensure_finite(z0[1], "newton initial guess").map_err(SolverError::from)?;
    let mut z = z0;

    for iteration in 0..config.max_iterations {
        let (y, jacobian) = f(&z)?;
        let residual = y - targets;
        let converged = (0..2).all(|i| residual_converged(residual[i], targets[i], config.tolerance));

        let inverse = jacobian.try_inverse().ok_or_else(|| {
            SolverError::convergence(format!(
                "Singular Jacobian in 2D Newton solve at z = ({}, {})",
                z[0], z[1]
            ))
        })?;
        z -= inverse * residual;
        tracing::trace!(iteration, z0 = z[0], z1 = z[1], "newton 2d step");

        if converged {
            return Ok(NewtonResult {
                x: z,
                iterations: iteration + 1,
            });
        }
        if z[0].is_nan() || z[1].is_nan() {
            return Err(SolverError::convergence("NaN detected in 2D Newton solve").into());
        }
    }

    Err(SolverError::convergence(format!(
        "2D Newton solve convergence failed: maximum number of iterations, {}, exceeded",
        config.max_iterations
    ))
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverResult;
    use approx::assert_relative_eq;

    #[test]
    fn simple_quadratic() {
        // Solve x^2 = 4, x > 0
        let f = |x: Real| -> SolverResult<(Real, Real)> { Ok((x * x, 2.0 * x)) };
        let result = newton_solve(4.0, 3.0, f, &NewtonConfig::default()).unwrap();
        assert_relative_eq!(result.x, 2.0, max_relative = 1e-9);
        assert!(result.iterations > 0);
    }

    #[test]
    fn zero_target_uses_absolute_check() {
        let f = |x: Real| -> SolverResult<(Real, Real)> { Ok((x.powi(3) + x, 3.0 * x * x + 1.0)) };
        let result = newton_solve(0.0, 0.7, f, &NewtonConfig::default()).unwrap();
        assert!(result.x.abs() < 1e-8);
    }

    #[test]
    fn nan_iterate_is_reported() {
        let f = |_x: Real| -> SolverResult<(Real, Real)> { Ok((Real::NAN, 1.0)) };
        let err = newton_solve(1.0, 1.0, f, &NewtonConfig::default()).unwrap_err();
        assert!(err.to_string().contains("NaN detected"));
    }

    #[test]
    fn iteration_limit_is_reported() {
        // No real root; Newton wanders forever
        let f = |x: Real| -> SolverResult<(Real, Real)> { Ok((x * x + 1.0, 2.0 * x)) };
        let config = NewtonConfig {
            max_iterations: 20,
            ..NewtonConfig::default()
        };
        let err = newton_solve(0.0, 0.5, f, &config).unwrap_err();
        assert!(matches!(err, SolverError::Convergence { .. }));
    }

    #[test]
    fn non_finite_guess_rejected() {
        let f = |x: Real| -> SolverResult<(Real, Real)> { Ok((x, 1.0)) };
        let err = newton_solve(1.0, Real::INFINITY, f, &NewtonConfig::default()).unwrap_err();
        assert!(matches!(err, SolverError::Numeric(_)));
    }

    #[test]
    fn linear_2d_system() {
        // x + 2y = 5, 3x - y = 1  =>  x = 1, y = 2
        let f = |z: &Vector2<Real>| -> SolverResult<(Vector2<Real>, Matrix2<Real>)> {
            let y = Vector2::new(z[0] + 2.0 * z[1], 3.0 * z[0] - z[1]);
            let j = Matrix2::new(1.0, 2.0, 3.0, -1.0);
            Ok((y, j))
        };
        let result = newton_solve_2d(
            Vector2::new(5.0, 1.0),
            Vector2::new(10.0, -3.0),
            f,
            &NewtonConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(result.x[0], 1.0, max_relative = 1e-10);
        assert_relative_eq!(result.x[1], 2.0, max_relative = 1e-10);
    }

    #[test]
    fn nonlinear_2d_system() {
        // x*y = 6, x + y^2 = 11  =>  x = 2, y = 3
        let f = |z: &Vector2<Real>| -> SolverResult<(Vector2<Real>, Matrix2<Real>)> {
            let (x, y) = (z[0], z[1]);
            Ok((
                Vector2::new(x * y, x + y * y),
                Matrix2::new(y, x, 1.0, 2.0 * y),
            ))
        };
        let result = newton_solve_2d(
            Vector2::new(6.0, 11.0),
            Vector2::new(2.5, 2.5),
            f,
            &NewtonConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(result.x[0], 2.0, max_relative = 1e-7);
        assert_relative_eq!(result.x[1], 3.0, max_relative = 1e-7);
    }

    #[test]
    fn singular_jacobian_is_reported() {
        let f = |z: &Vector2<Real>| -> SolverResult<(Vector2<Real>, Matrix2<Real>)> {
            Ok((Vector2::new(z[0] + z[1], z[0] + z[1]), Matrix2::new(1.0, 1.0, 1.0, 1.0)))
        };
        let err = newton_solve_2d(
            Vector2::new(1.0, 2.0),
            Vector2::new(0.0, 0.0),
            f,
            &NewtonConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Singular Jacobian"));
    }
}
