//! Mixture errors.

use fp_fluids::{ErrorKind, FluidError};
use fp_solver::SolverError;
use thiserror::Error;

pub type MixtureResult<T> = Result<T, MixtureError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MixtureError {
    /// Mass fractions that do not describe a mixture.
    #[error("Invalid composition: {what}")]
    Composition { what: String },

    /// Invalid mixture definition.
    #[error("Invalid input in {mixture}: {what}")]
    InvalidInput { mixture: String, what: String },

    /// A component fluid failed; its own message names the fluid.
    #[error(transparent)]
    Fluid(#[from] FluidError),

    /// Root finder failure with mixture context attached.
    #[error("{source} in {mixture}: {op}()")]
    Solver {
        mixture: String,
        op: &'static str,
        #[source]
        source: SolverError,
    },

    /// Root finder failure that has not yet been given mixture context.
    #[error("{0}")]
    Numeric(#[from] SolverError),
}

impl MixtureError {
    pub fn composition(what: impl Into<String>) -> Self {
        MixtureError::Composition { what: what.into() }
    }

    /// Attach mixture/operation context to a bare solver error.
    pub fn in_context(self, mixture: &str, op: &'static str) -> Self {
        match self {
            MixtureError::Numeric(source) => MixtureError::Solver {
                mixture: mixture.to_string(),
                op,
                source,
            },
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MixtureError::Composition { .. } | MixtureError::InvalidInput { .. } => {
                ErrorKind::InvalidInput
            }
            MixtureError::Fluid(err) => err.kind(),
            MixtureError::Solver { source, .. } | MixtureError::Numeric(source) => match source {
                SolverError::Convergence { .. } => ErrorKind::Convergence,
                SolverError::InvalidInput { .. } | SolverError::Numeric(_) => {
                    ErrorKind::InvalidInput
                }
            },
        }
    }
}
