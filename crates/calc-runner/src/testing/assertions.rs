//! Assertion helpers for suite test bodies
//!
//! Each helper returns a [`TestResult`] so a test body can use `?` and stop at
//! the first failed check. Mismatches read `expected:<A> but was:<B>`.

use calc_app::mock::VerificationError;
use calc_app::CalcError;
use std::fmt::Debug;
use thiserror::Error;

/// A failed check inside a test body
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct AssertionError {
    message: String,
}

impl AssertionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<VerificationError> for AssertionError {
    fn from(err: VerificationError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<CalcError> for AssertionError {
    fn from(err: CalcError) -> Self {
        Self::new(format!("unexpected calculator error: {}", err))
    }
}

/// Outcome of a test body
pub type TestResult = Result<(), AssertionError>;

/// Check that `actual` equals `expected`
pub fn check_eq<T: PartialEq + Debug>(expected: T, actual: T) -> TestResult {
    if expected == actual {
        Ok(())
    } else {
        Err(AssertionError::new(mismatch(&expected, &actual)))
    }
}

/// Like [`check_eq`], prefixing the mismatch with `message`
pub fn check_eq_msg<T: PartialEq + Debug>(message: &str, expected: T, actual: T) -> TestResult {
    check_eq(expected, actual)
        .map_err(|err| AssertionError::new(format!("{} {}", message, err.message())))
}

/// Check that two floats are within `delta` of each other
pub fn check_close(expected: f64, actual: f64, delta: f64) -> TestResult {
    if (expected - actual).abs() <= delta {
        Ok(())
    } else {
        Err(AssertionError::new(mismatch(&expected, &actual)))
    }
}

/// Check a condition, failing with `message` when it does not hold
pub fn check(condition: bool, message: &str) -> TestResult {
    if condition {
        Ok(())
    } else {
        Err(AssertionError::new(message))
    }
}

/// Fail unconditionally
pub fn fail(message: &str) -> TestResult {
    Err(AssertionError::new(message))
}

fn mismatch<T: Debug>(expected: &T, actual: &T) -> String {
    format!("expected:<{:?}> but was:<{:?}>", expected, actual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_app::mock::{times, Invocation, Operation};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_check_eq() {
        assert!(check_eq(4, 2 + 2).is_ok());

        let err = check_eq(5, 2 + 2).unwrap_err();
        assert_eq!(err.message(), "expected:<5> but was:<4>");
    }

    #[test]
    fn test_check_eq_msg() {
        let err = check_eq_msg("sum", 30.0, 31.0).unwrap_err();
        assert_eq!(err.message(), "sum expected:<30.0> but was:<31.0>");
    }

    #[test]
    fn test_check_close() {
        assert!(check_close(0.3, 0.1 + 0.2, 1e-9).is_ok());
        assert!(check_close(1.0, 1.1, 0.05).is_err());
    }

    #[test]
    fn test_check_and_fail() {
        assert!(check(true, "unused").is_ok());
        assert_eq!(check(false, "nope").unwrap_err().message(), "nope");
        assert_eq!(fail("boom").unwrap_err().message(), "boom");
    }

    #[test]
    fn test_from_verification_error() {
        let err: AssertionError = VerificationError::WrongCount {
            invocation: Invocation::new(Operation::Add, 10.0, 20.0),
            wanted: times(1),
            actual: 0,
        }
        .into();
        assert_eq!(
            err.message(),
            "wanted 1 invocation of add(10.0, 20.0) but was 0"
        );
    }

    #[test]
    fn test_from_calc_error() {
        let err: AssertionError = CalcError::DivisionByZero.into();
        assert_eq!(err.message(), "unexpected calculator error: division by zero");
    }
}
