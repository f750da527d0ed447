//! Error types for root finding.

use fp_core::CoreError;
use thiserror::Error;

/// Errors raised by the root finders themselves.
///
/// Residual-evaluation failures are not represented here; they surface as the
/// caller's own error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("{what}")]
    InvalidInput { what: String },

    #[error("{what}")]
    Convergence { what: String },

    #[error("Numeric error: {0}")]
    Numeric(#[from] CoreError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    pub(crate) fn invalid_input(what: impl Into<String>) -> Self {
        SolverError::InvalidInput { what: what.into() }
    }

    pub(crate) fn convergence(what: impl Into<String>) -> Self {
        SolverError::Convergence { what: what.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_message() {
        let err = SolverError::invalid_input("Root must be bracketed in brent::root");
        assert_eq!(err.to_string(), "Root must be bracketed in brent::root");
    }

    #[test]
    fn core_error_converts() {
        let err: SolverError = CoreError::NonFinite {
            what: "newton iterate",
            value: f64::NAN,
        }
        .into();
        assert!(matches!(err, SolverError::Numeric(_)));
    }
}
