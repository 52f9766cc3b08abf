// error.rs

use thiserror::Error;

use crate::operations::Operation;

/// Every recoverable failure the calculator can report.
#[derive(Debug, Error)]
pub enum CalcError {
    /// Operand text was not a finite number, or exceeded the magnitude bound.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The result is mathematically undefined or not a real number.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Division by zero in {0}")]
    DivisionByZero(Operation),

    /// Reading or writing the history file failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A stored row could not be turned back into a calculation.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type CalcResult<T> = Result<T, CalcError>;

impl From<std::io::Error> for CalcError {
    fn from(err: std::io::Error) -> Self {
        CalcError::Persistence(err.to_string())
    }
}
