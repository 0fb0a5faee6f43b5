//! `MathApplicationTesterWithCalculator`: the real service injected

use crate::testing::assertions::{check_close, check_eq_msg, fail, TestResult};
use crate::testing::TestSuite;
use calc_app::{CalcError, MathApplication, StandardCalculator};
use std::sync::Arc;

pub const SUITE_NAME: &str = "MathApplicationTesterWithCalculator";

const DELTA: f64 = 1e-9;

pub fn suite() -> TestSuite {
    TestSuite::new(SUITE_NAME)
        .with_test("test_arithmetic", test_arithmetic)
        .with_test("test_fractions", test_fractions)
        .with_test("test_divide_by_zero", test_divide_by_zero)
        // TODO: un-ignore once StandardCalculator reports overflow instead of returning infinity
        .with_ignored("test_multiply_overflow", test_multiply_overflow)
}

fn app() -> MathApplication {
    MathApplication::new(Arc::new(StandardCalculator::new()))
}

fn test_arithmetic() -> TestResult {
    let app = app();

    check_eq_msg("add", 30.0, app.add(10.0, 20.0)?)?;
    check_eq_msg("subtract", 10.0, app.subtract(20.0, 10.0)?)?;
    check_eq_msg("multiply", 200.0, app.multiply(10.0, 20.0)?)?;
    check_eq_msg("divide", 2.0, app.divide(20.0, 10.0)?)
}

fn test_fractions() -> TestResult {
    let app = app();

    check_close(0.3, app.add(0.1, 0.2)?, DELTA)?;
    check_close(1.0 / 3.0, app.divide(1.0, 3.0)?, DELTA)
}

fn test_multiply_overflow() -> TestResult {
    match app().multiply(f64::MAX, 2.0) {
        Err(_) => Ok(()),
        other => fail(&format!("expected an overflow error, got {:?}", other)),
    }
}

fn test_divide_by_zero() -> TestResult {
    match app().divide(1.0, 0.0) {
        Err(CalcError::DivisionByZero) => Ok(()),
        other => fail(&format!("expected DivisionByZero, got {:?}", other)),
    }
}
