//! Error types for engine sizing and off-design evaluation.

use tc_components::ComponentError;
use tc_solver::SolverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Engine has not been sized; call size() first")]
    NotSized,

    #[error("Empty batch of flight conditions")]
    EmptyBatch,

    #[error("Seed holds {found} conditions, batch has {expected}")]
    SeedMismatch { expected: usize, found: usize },

    #[error("Design cycle is non-physical: {what}")]
    NonPhysicalDesign { what: String },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub(crate) fn invalid(field: &str, value: impl ToString, reason: &str) -> Self {
        EngineError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
