//! Run command - execute one suite and report the outcome

use crate::config::Config;
use crate::testing::{RunResult, SuiteRegistry, TestReporter, TestRunner};
use anyhow::{Context, Result};

/// Resolve the configured suite, run it, and print the result.
///
/// Resolution errors return before anything is written to stdout. Test
/// failures are part of the returned result, not an error.
pub fn run(config: &Config, registry: &SuiteRegistry) -> Result<RunResult> {
    let suite = registry.resolve(&config.suite)?;

    let runner = TestRunner::new().with_parallel(config.parallel);
    let result = runner.run(suite);

    TestReporter::new(config.format)
        .with_no_color(config.no_color)
        .report(&result)
        .context("failed to write test report")?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suites::builtin_registry;
    use crate::testing::assertions::{check_eq, TestResult};
    use crate::testing::{RunnerError, TestSuite};

    fn two_plus_two_is_five() -> TestResult {
        check_eq(5, 2 + 2)
    }

    fn passing() -> TestResult {
        Ok(())
    }

    #[test]
    fn test_run_default_suite() {
        let registry = builtin_registry().unwrap();
        let result = run(&Config::default(), &registry).unwrap();

        assert!(result.was_successful());
        assert_eq!(result.suite(), "MathApplicationTesterWithInjectMocks");
    }

    #[test]
    fn test_run_unknown_suite() {
        let registry = builtin_registry().unwrap();
        let config = Config {
            suite: "NoSuchSuite".to_string(),
            ..Config::default()
        };

        let err = run(&config, &registry).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RunnerError>(),
            Some(RunnerError::SuiteNotFound { .. })
        ));
    }

    #[test]
    fn test_run_parallel() {
        let registry = builtin_registry().unwrap();
        let config = Config {
            suite: "MathApplicationTesterWithMock".to_string(),
            parallel: true,
            ..Config::default()
        };

        let result = run(&config, &registry).unwrap();
        assert_eq!(result.run_count(), 4);
        assert!(result.was_successful());
    }

    #[test]
    fn test_failing_suite_is_not_an_error() {
        let mut registry = SuiteRegistry::new();
        registry
            .register(
                TestSuite::new("Arithmetic")
                    .with_test("test_sum", two_plus_two_is_five)
                    .with_test("test_pass", passing),
            )
            .unwrap();
        let config = Config {
            suite: "Arithmetic".to_string(),
            ..Config::default()
        };

        let result = run(&config, &registry).unwrap();
        assert!(!result.was_successful());
        assert_eq!(result.failure_count(), 1);
        assert_eq!(
            result.failures()[0].to_string(),
            "test_sum(Arithmetic): expected:<5> but was:<4>"
        );
    }
}
