//! Brent's method: interval bracketing followed by the inverse-quadratic /
//! secant / bisection hybrid root polish.

use crate::error::SolverError;
use fp_core::Real;

/// Bracket expansion settings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BracketConfig {
    /// Geometric growth applied to the interval on every expansion
    pub factor: Real,
    /// Maximum number of expansions before giving up
    pub max_iterations: usize,
    /// Expanded endpoints never drop below this value
    pub floor: Real,
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            factor: 1.6,
            max_iterations: 50,
            floor: 1e-10,
        }
    }
}

/// Root polish settings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrentConfig {
    /// Absolute tolerance on the root
    pub tolerance: Real,
    /// Machine-precision guard scaled by |b|
    pub eps: Real,
    /// Maximum number of iterations
    pub max_iterations: usize,
}

impl Default for BrentConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            eps: 1e-12,
            max_iterations: 100,
        }
    }
}

/// Grow `[x1, x2]` until `f` changes sign across it, using default settings.
///
/// On success `x1` and `x2` are overwritten with the bracketing endpoints.
pub fn bracket<F, E>(f: F, x1: &mut Real, x2: &mut Real) -> Result<(), E>
where
    F: FnMut(Real) -> Result<Real, E>,
    E: From<SolverError>,
{
    bracket_with(f, x1, x2, &BracketConfig::default())
}

/// Grow `[x1, x2]` until `f` changes sign across it.
///
/// The endpoint with the smaller |f| is pushed outward by `factor` times the
/// current interval width and floored at `config.floor`.
///
/// # Errors
/// * `SolverError::InvalidInput` if `x1 == x2`
/// * `SolverError::Convergence` if no sign change appears within
///   `config.max_iterations` expansions
/// * any error returned by `f`
pub fn bracket_with<F, E>(
    mut f: F,
    x1: &mut Real,
    x2: &mut Real,
    config: &BracketConfig,
) -> Result<(), E>
where
    F: FnMut(Real) -> Result<Real, E>,
    E: From<SolverError>,
{
    if *x1 == *x2 {
        return Err(SolverError::invalid_input("Bad initial range (0) used in brent::bracket").into());
    }

    let mut f1 = f(*x1)?;
    let mut f2 = f(*x2)?;

    let mut iterations = 0;
    while f1 * f2 > 0.0 {
        if f1.abs() < f2.abs() {
            *x1 += config.factor * (*x1 - *x2);
            *x1 = x1.max(config.floor);
            f1 = f(*x1)?;
        } else {
            *x2 += config.factor * (*x2 - *x1);
            *x2 = x2.max(config.floor);
            f2 = f(*x2)?;
        }
        tracing::trace!(x1 = *x1, x2 = *x2, f1, f2, "bracket expanded");

        iterations += 1;
        if iterations >= config.max_iterations {
            return Err(SolverError::convergence(format!(
                "No bracketing interval found by brent::bracket after {} iterations",
                config.max_iterations
            ))
            .into());
        }
    }

    Ok(())
}

/// Find a root of `f` inside the bracket `[x1, x2]` with default settings.
pub fn root<F, E>(f: F, x1: Real, x2: Real) -> Result<Real, E>
where
    F: FnMut(Real) -> Result<Real, E>,
    E: From<SolverError>,
{
    root_with(f, x1, x2, &BrentConfig::default())
}

/// Find a root of `f` inside the bracket `[x1, x2]`.
///
/// Converges when half the bracket width drops below `2·eps·|b| + tol/2` or the
/// residual is exactly zero.
///
/// # Errors
/// * `SolverError::InvalidInput` if `f(x1)` and `f(x2)` share a sign
/// * `SolverError::Convergence` if `config.max_iterations` is exhausted
/// * any error returned by `f`
pub fn root_with<F, E>(mut f: F, x1: Real, x2: Real, config: &BrentConfig) -> Result<Real, E>
where
    F: FnMut(Real) -> Result<Real, E>,
    E: From<SolverError>,
{
    let mut a = x1;
    let mut b = x2;
    let mut c = x2;
    let mut d = 0.0;
    let mut e = 0.0;
    let mut fa = f(a)?;
    let mut fb = f(b)?;

    if fa * fb > 0.0 {
        return Err(SolverError::invalid_input("Root must be bracketed in brent::root").into());
    }

    let mut fc = fb;
    for iteration in 0..config.max_iterations {
        if fb * fc > 0.0 {
            // Rename so that b and c bracket the root
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * config.eps * b.abs() + 0.5 * config.tolerance;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol1 || fb == 0.0 {
            tracing::debug!(root = b, iterations = iteration, "brent root converged");
            return Ok(b);
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // Attempt inverse quadratic interpolation
            let s = fb / fa;
            let mut p;
            let mut q;
            if a == c {
                p = 2.0 * xm * s;
                q = 1.0 - s;
            } else {
                let qa = fa / fc;
                let r = fb / fc;
                p = s * (2.0 * xm * qa * (qa - r) - (b - a) * (r - 1.0));
                q = (qa - 1.0) * (r - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();

            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                // Accept interpolation
                e = d;
                d = p / q;
            } else {
                // Fall back to bisection
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        if d.abs() > tol1 {
            b += d;
        } else {
            b += tol1.abs().copysign(xm);
        }
        fb = f(b)?;
    }

    Err(SolverError::convergence("Maximum number of iterations exceeded in brent::root").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverResult;
    use approx::assert_relative_eq;

    fn reference(x: Real) -> Real {
        (1.0 + x).ln() * (x / 3.0).tanh() + x / 4.0 - 3.0
    }

    #[test]
    fn brackets_and_solves_reference_function() {
        let f = |x: Real| -> SolverResult<Real> { Ok(reference(x)) };

        let mut x1 = 0.5;
        let mut x2 = 1.0;
        bracket(f, &mut x1, &mut x2).unwrap();
        assert!(reference(x1) * reference(x2) <= 0.0);

        let x = root(f, x1, x2).unwrap();
        assert_relative_eq!(x, 5.170302597, epsilon = 1e-8);
    }

    #[test]
    fn solves_reference_function_on_given_interval() {
        let f = |x: Real| -> SolverResult<Real> { Ok(reference(x)) };
        let x = root(f, 0.5, 10.0).unwrap();
        assert_relative_eq!(x, 5.170302597, epsilon = 1e-8);
        assert_relative_eq!(reference(x), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn bracket_rejects_empty_range() {
        let f = |x: Real| -> SolverResult<Real> { Ok(reference(x)) };
        let mut x1 = 1.0;
        let mut x2 = 1.0;
        let err = bracket(f, &mut x1, &mut x2).unwrap_err();
        assert!(matches!(err, SolverError::InvalidInput { .. }));
        assert!(err.to_string().starts_with("Bad initial range (0) used"));
    }

    #[test]
    fn bracket_gives_up_without_sign_change() {
        let f = |x: Real| -> SolverResult<Real> { Ok(reference(x) + 4.0) };
        let mut x1 = 0.5;
        let mut x2 = 1.0;
        let err = bracket(f, &mut x1, &mut x2).unwrap_err();
        assert!(matches!(err, SolverError::Convergence { .. }));
        assert!(err.to_string().contains("after 50 iterations"));
    }

    #[test]
    fn bracket_respects_floor() {
        let f = |x: Real| -> SolverResult<Real> { Ok(reference(x) + 4.0) };
        let mut x1 = 0.5;
        let mut x2 = 1.0;
        let config = BracketConfig {
            max_iterations: 5,
            ..BracketConfig::default()
        };
        let _ = bracket_with(f, &mut x1, &mut x2, &config);
        assert!(x1 >= config.floor);
    }

    #[test]
    fn root_requires_bracket() {
        let f = |x: Real| -> SolverResult<Real> { Ok(reference(x)) };
        let err = root(f, 0.5, 1.0).unwrap_err();
        assert!(matches!(err, SolverError::InvalidInput { .. }));
        assert!(err.to_string().contains("Root must be bracketed"));
    }

    #[test]
    fn root_reports_iteration_limit() {
        let f = |x: Real| -> SolverResult<Real> { Ok(reference(x)) };
        let config = BrentConfig {
            max_iterations: 2,
            ..BrentConfig::default()
        };
        let err = root_with(f, 0.0, 100.0, &config).unwrap_err();
        assert!(matches!(err, SolverError::Convergence { .. }));
    }

    #[test]
    fn root_accepts_exact_zero_endpoint() {
        let f = |x: Real| -> SolverResult<Real> { Ok(x - 2.0) };
        let x = root(f, 2.0, 5.0).unwrap();
        assert_eq!(x, 2.0);
    }

    #[test]
    fn residual_errors_pass_through() {
        #[derive(Debug, PartialEq)]
        enum Outer {
            Domain,
            Solver(SolverError),
        }
        impl From<SolverError> for Outer {
            fn from(e: SolverError) -> Self {
                Outer::Solver(e)
            }
        }

        let f = |x: Real| -> Result<Real, Outer> {
            if x > 3.0 { Err(Outer::Domain) } else { Ok(x - 10.0) }
        };
        let mut x1 = 1.0;
        let mut x2 = 2.0;
        assert_eq!(bracket(f, &mut x1, &mut x2).unwrap_err(), Outer::Domain);
    }
}
