//! Fluid property errors.

use fp_solver::SolverError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Coarse classification of a [`FluidError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied an unusable argument (e.g. a degenerate bracket).
    InvalidInput,
    /// An iterative inversion did not converge.
    Convergence,
    /// The state lies outside the validity range of a correlation.
    Domain,
    /// The fluid does not provide the requested property.
    NotImplemented,
}

/// Errors that can occur during fluid property calculations.
///
/// Every variant raised by a fluid names the fluid and the operation, so the
/// message alone is enough to locate the failing call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// State outside the validity range of a correlation.
    #[error("{what} in {fluid}: {op}()")]
    Domain {
        fluid: String,
        op: &'static str,
        what: String,
    },

    /// Invalid argument.
    #[error("Invalid input in {fluid}: {op}(): {what}")]
    InvalidInput {
        fluid: String,
        op: &'static str,
        what: String,
    },

    /// Iterative inversion failed.
    #[error("Convergence failed in {fluid}: {op}(): {what}")]
    Convergence {
        fluid: String,
        op: &'static str,
        what: String,
    },

    /// Root finder failure with fluid context attached.
    #[error("{source} in {fluid}: {op}()")]
    Solver {
        fluid: String,
        op: &'static str,
        #[source]
        source: SolverError,
    },

    /// Property not provided by this fluid.
    #[error("The fluid '{fluid}' has not implemented the method {op}()")]
    NotImplemented { fluid: String, op: &'static str },

    /// Root finder failure that has not yet been given fluid context.
    #[error("{0}")]
    Numeric(#[from] SolverError),
}

impl FluidError {
    pub fn domain(fluid: &str, op: &'static str, what: impl Into<String>) -> Self {
        FluidError::Domain {
            fluid: fluid.to_string(),
            op,
            what: what.into(),
        }
    }

    pub fn invalid_input(fluid: &str, op: &'static str, what: impl Into<String>) -> Self {
        FluidError::InvalidInput {
            fluid: fluid.to_string(),
            op,
            what: what.into(),
        }
    }

    pub fn convergence(fluid: &str, op: &'static str, what: impl Into<String>) -> Self {
        FluidError::Convergence {
            fluid: fluid.to_string(),
            op,
            what: what.into(),
        }
    }

    pub fn not_implemented(fluid: &str, op: &'static str) -> Self {
        FluidError::NotImplemented {
            fluid: fluid.to_string(),
            op,
        }
    }

    /// Attach fluid/operation context to a bare solver error.
    ///
    /// Errors that already carry context are returned unchanged, so this can be
    /// applied at every level of a nested inversion.
    pub fn in_context(self, fluid: &str, op: &'static str) -> Self {
        match self {
            FluidError::Numeric(source) => FluidError::Solver {
                fluid: fluid.to_string(),
                op,
                source,
            },
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FluidError::Domain { .. } => ErrorKind::Domain,
            FluidError::InvalidInput { .. } => ErrorKind::InvalidInput,
            FluidError::Convergence { .. } => ErrorKind::Convergence,
            FluidError::NotImplemented { .. } => ErrorKind::NotImplemented,
            FluidError::Solver { source, .. } | FluidError::Numeric(source) => match source {
                SolverError::Convergence { .. } => ErrorKind::Convergence,
                SolverError::InvalidInput { .. } | SolverError::Numeric(_) => {
                    ErrorKind::InvalidInput
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::domain("co2", "vapor_pressure", "Temperature is out of range");
        assert_eq!(
            err.to_string(),
            "Temperature is out of range in co2: vapor_pressure()"
        );

        let err = FluidError::not_implemented("ideal_gas", "vapor_pressure");
        assert!(err.to_string().contains("ideal_gas"));
        assert!(err.to_string().contains("vapor_pressure()"));
    }

    #[test]
    fn solver_errors_gain_context() {
        let bare: FluidError = SolverError::Convergence {
            what: "Maximum number of iterations exceeded in brent::root".into(),
        }
        .into();
        assert_eq!(bare.kind(), ErrorKind::Convergence);

        let err = bare.in_context("nitrogen", "rho_from_p_t");
        let msg = err.to_string();
        assert!(msg.contains("nitrogen"));
        assert!(msg.contains("rho_from_p_t()"));
        assert_eq!(err.kind(), ErrorKind::Convergence);
    }

    #[test]
    fn context_is_not_overwritten() {
        let err = FluidError::domain("co2", "mu_from_rho_t", "Parameters out of range")
            .in_context("mixture", "mu_from_p_t");
        assert!(err.to_string().contains("co2"));
    }
}
