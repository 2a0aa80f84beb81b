//! Error types for solver operations.

use tc_components::ComponentError;
use tc_core::error::TcError;
use thiserror::Error;

/// Errors that can occur during a batch solve.
#[derive(Error, Debug, Clone)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Condition {column} did not converge in {iterations} iterations (residual = {residual_norm:e})")]
    NonConvergence {
        column: usize,
        iterations: usize,
        residual_norm: f64,
    },

    #[error("Singular Jacobian for condition {column} at iteration {iteration}")]
    SingularJacobian { column: usize, iteration: usize },

    #[error("Non-finite residual for condition {column}: {what}")]
    NonFinite { column: usize, what: String },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for TcError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::ProblemSetup { .. } => TcError::InvalidArg {
                what: "problem setup",
            },
            SolverError::NonConvergence { residual_norm, .. } => TcError::NonFinite {
                what: "unconverged residual norm",
                value: residual_norm,
            },
            SolverError::SingularJacobian { .. } => TcError::Invariant {
                what: "jacobian must be non-singular",
            },
            SolverError::NonFinite { .. } => TcError::Invariant {
                what: "residual must be finite",
            },
            SolverError::Component(c) => c.into(),
            SolverError::Numeric { .. } => TcError::InvalidArg { what: "numeric" },
        }
    }
}
