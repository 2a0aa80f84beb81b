//! Error types for component operations.

use tc_core::error::TcError;
use thiserror::Error;

/// Errors that can occur during component calculations.
#[derive(Error, Debug, Clone)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Out of range: {what} = {value} (expected {expected})")]
    OutOfRange {
        what: &'static str,
        value: f64,
        expected: &'static str,
    },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<TcError> for ComponentError {
    fn from(e: TcError) -> Self {
        match e {
            TcError::NonFinite { what, .. } => ComponentError::NonPhysical { what },
            TcError::InvalidArg { what } => ComponentError::InvalidArg { what },
            TcError::OutOfRange {
                what,
                value,
                expected,
            } => ComponentError::OutOfRange {
                what,
                value,
                expected,
            },
            TcError::Invariant { what } => ComponentError::NonPhysical { what },
        }
    }
}

impl From<ComponentError> for TcError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::NonPhysical { what } => TcError::InvalidArg { what },
            ComponentError::ConvergenceFailed { what } => TcError::InvalidArg { what },
            ComponentError::InvalidArg { what } => TcError::InvalidArg { what },
            ComponentError::OutOfRange {
                what,
                value,
                expected,
            } => TcError::OutOfRange {
                what,
                value,
                expected,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ComponentError::NonPhysical { what: "density" };
        assert!(err.to_string().contains("density"));
    }

    #[test]
    fn error_conversion() {
        let comp_err = ComponentError::InvalidArg { what: "test" };
        let tc_err: TcError = comp_err.into();
        assert!(matches!(tc_err, TcError::InvalidArg { .. }));
    }

    #[test]
    fn out_of_range_survives_round_trip() {
        let core = TcError::OutOfRange {
            what: "efficiency",
            value: 1.2,
            expected: "in (0, 1]",
        };
        let comp: ComponentError = core.into();
        assert!(comp.to_string().contains("efficiency"));
        let back: TcError = comp.into();
        assert!(matches!(back, TcError::OutOfRange { value, .. } if value == 1.2));
    }
}
