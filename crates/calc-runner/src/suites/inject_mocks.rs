//! `MathApplicationTesterWithInjectMocks`
//!
//! A `MockCalculatorService` is injected into `MathApplication` through its
//! constructor. Each test stubs the calls it needs, exercises the
//! application, then verifies how the mock was called.

use crate::testing::assertions::{check_eq, fail, TestResult};
use crate::testing::TestSuite;
use calc_app::mock::{at_least, at_most, never, times, MockCalculatorService, Operation};
use calc_app::{CalcError, MathApplication};
use std::sync::Arc;

pub const SUITE_NAME: &str = "MathApplicationTesterWithInjectMocks";

pub fn suite() -> TestSuite {
    TestSuite::new(SUITE_NAME)
        .with_test("test_add", test_add)
        .with_test("test_add_called_three_times", test_add_called_three_times)
        .with_test("test_subtract", test_subtract)
        .with_test("test_multiply_and_divide", test_multiply_and_divide)
        .with_test("test_stubbed_failure", test_stubbed_failure)
        .with_test("test_unstubbed_call", test_unstubbed_call)
}

/// Application with a fresh mock injected through the constructor
fn inject_mock() -> (Arc<MockCalculatorService>, MathApplication) {
    let service = Arc::new(MockCalculatorService::new());
    let app = MathApplication::new(service.clone());
    (service, app)
}

fn test_add() -> TestResult {
    let (service, app) = inject_mock();
    service.when(Operation::Add, 10.0, 20.0).then_return(30.0);

    check_eq(30.0, app.add(10.0, 20.0)?)?;
    service.verify(Operation::Add, 10.0, 20.0, times(1))?;
    Ok(())
}

fn test_add_called_three_times() -> TestResult {
    let (service, app) = inject_mock();
    service.when(Operation::Add, 10.0, 20.0).then_return(30.0);

    for _ in 0..3 {
        check_eq(30.0, app.add(10.0, 20.0)?)?;
    }

    check_eq(3, service.invocation_count(Operation::Add, 10.0, 20.0))?;
    service.verify(Operation::Add, 10.0, 20.0, times(3))?;
    service.verify(Operation::Subtract, 10.0, 20.0, never())?;
    Ok(())
}

fn test_subtract() -> TestResult {
    let (service, app) = inject_mock();
    service.when(Operation::Subtract, 20.0, 10.0).then_return(10.0);

    check_eq(10.0, app.subtract(20.0, 10.0)?)?;
    check_eq(10.0, app.subtract(20.0, 10.0)?)?;

    service.verify(Operation::Subtract, 20.0, 10.0, at_least(1))?;
    service.verify(Operation::Subtract, 20.0, 10.0, at_most(2))?;
    Ok(())
}

fn test_multiply_and_divide() -> TestResult {
    let (service, app) = inject_mock();
    service.when(Operation::Multiply, 10.0, 20.0).then_return(200.0);
    service.when(Operation::Divide, 20.0, 10.0).then_return(2.0);

    check_eq(200.0, app.multiply(10.0, 20.0)?)?;
    check_eq(2.0, app.divide(20.0, 10.0)?)?;

    service.verify(Operation::Multiply, 10.0, 20.0, times(1))?;
    service.verify(Operation::Divide, 20.0, 10.0, times(1))?;
    service.verify_no_more_interactions()?;
    Ok(())
}

fn test_stubbed_failure() -> TestResult {
    let (service, app) = inject_mock();
    service
        .when(Operation::Add, 10.0, 20.0)
        .then_fail("add operation not implemented");

    match app.add(10.0, 20.0) {
        Err(CalcError::Service(message)) => {
            check_eq("add operation not implemented", message.as_str())?
        }
        other => return fail(&format!("expected a service failure, got {:?}", other)),
    }

    service.verify(Operation::Add, 10.0, 20.0, times(1))?;
    Ok(())
}

fn test_unstubbed_call() -> TestResult {
    let (service, app) = inject_mock();

    check_eq(0.0, app.multiply(3.0, 3.0)?)?;
    service.verify(Operation::Multiply, 3.0, 3.0, times(1))?;
    Ok(())
}
