use thiserror::Error;

pub type TcResult<T> = Result<T, TcError>;

#[derive(Error, Debug)]
pub enum TcError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Out of range: {what} = {value} (expected {expected})")]
    OutOfRange {
        what: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
