//! Calculator errors

use thiserror::Error;

/// Errors raised by a calculator service or the application using it
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("no calculator service has been injected")]
    ServiceNotInjected,

    #[error("calculator service failed: {0}")]
    Service(String),
}

/// Result type for calculator operations
pub type CalcResult<T> = Result<T, CalcError>;
