//! `MathApplicationTesterWithMock`
//!
//! Mocks are created directly and handed to the application with the
//! setter. Plain verification does not care in which order calls were made;
//! `verify_in_order` does.

use crate::testing::assertions::{check, check_eq, fail, TestResult};
use crate::testing::TestSuite;
use calc_app::mock::{call, times, MockCalculatorService, Operation};
use calc_app::{CalcError, MathApplication};
use std::sync::Arc;

pub const SUITE_NAME: &str = "MathApplicationTesterWithMock";

pub fn suite() -> TestSuite {
    TestSuite::new(SUITE_NAME)
        .with_test("test_verify_ignores_order", test_verify_ignores_order)
        .with_test("test_verify_in_order", test_verify_in_order)
        .with_test("test_reset", test_reset)
        .with_test("test_missing_service", test_missing_service)
}

fn mocked_app() -> (Arc<MockCalculatorService>, MathApplication) {
    let service = Arc::new(MockCalculatorService::new());
    let mut app = MathApplication::default();
    app.set_calculator_service(service.clone());
    (service, app)
}

fn test_verify_ignores_order() -> TestResult {
    let (service, app) = mocked_app();
    service.when(Operation::Add, 20.0, 10.0).then_return(30.0);
    service.when(Operation::Subtract, 20.0, 10.0).then_return(10.0);

    check_eq(10.0, app.subtract(20.0, 10.0)?)?;
    check_eq(30.0, app.add(20.0, 10.0)?)?;

    service.verify(Operation::Add, 20.0, 10.0, times(1))?;
    service.verify(Operation::Subtract, 20.0, 10.0, times(1))?;
    Ok(())
}

fn test_verify_in_order() -> TestResult {
    let (service, app) = mocked_app();
    service.when(Operation::Add, 20.0, 10.0).then_return(30.0);
    service.when(Operation::Subtract, 20.0, 10.0).then_return(10.0);

    app.add(20.0, 10.0)?;
    app.subtract(20.0, 10.0)?;

    service.verify_in_order(&[
        call(Operation::Add, 20.0, 10.0),
        call(Operation::Subtract, 20.0, 10.0),
    ])?;

    let reversed = service.verify_in_order(&[
        call(Operation::Subtract, 20.0, 10.0),
        call(Operation::Add, 20.0, 10.0),
    ]);
    check(reversed.is_err(), "reversed order should not verify")
}

fn test_reset() -> TestResult {
    let (service, app) = mocked_app();
    service.when(Operation::Add, 20.0, 10.0).then_return(30.0);
    check_eq(30.0, app.add(20.0, 10.0)?)?;

    service.reset();

    check_eq(0.0, app.add(20.0, 10.0)?)?;
    check_eq(1, service.invocations().len())
}

fn test_missing_service() -> TestResult {
    let app = MathApplication::default();

    match app.add(1.0, 2.0) {
        Err(CalcError::ServiceNotInjected) => Ok(()),
        other => fail(&format!("expected ServiceNotInjected, got {:?}", other)),
    }
}
