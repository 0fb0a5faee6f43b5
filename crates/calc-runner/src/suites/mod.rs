//! Built-in test suites for the calculator application

pub mod calculator;
pub mod inject_mocks;
pub mod mock_api;

use crate::testing::{RunnerError, SuiteRegistry};

/// Suite run when no other is requested
pub const DEFAULT_SUITE: &str = inject_mocks::SUITE_NAME;

/// Registry containing every built-in suite
pub fn builtin_registry() -> Result<SuiteRegistry, RunnerError> {
    let mut registry = SuiteRegistry::new();
    registry.register(inject_mocks::suite())?;
    registry.register(mock_api::suite())?;
    registry.register(calculator::suite())?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestRunner;

    #[test]
    fn test_builtin_registry_names() {
        let registry = builtin_registry().unwrap();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec![
                "MathApplicationTesterWithInjectMocks",
                "MathApplicationTesterWithMock",
                "MathApplicationTesterWithCalculator",
            ]
        );
    }

    #[test]
    fn test_calculator_suite_ignores_overflow_test() {
        let registry = builtin_registry().unwrap();
        let suite = registry.resolve(calculator::SUITE_NAME).unwrap();
        let result = TestRunner::new().run(suite);

        assert!(result.was_successful());
        assert_eq!(result.run_count(), 3);
        assert_eq!(result.ignore_count(), 1);
        assert!(result
            .runs()
            .iter()
            .any(|r| r.name == "test_multiply_overflow" && r.outcome.is_ignored()));
    }

    #[test]
    fn test_default_suite_resolves() {
        let registry = builtin_registry().unwrap();
        assert!(registry.resolve(DEFAULT_SUITE).is_ok());
    }

    #[test]
    fn test_builtin_suites_pass() {
        let registry = builtin_registry().unwrap();

        for name in registry.names() {
            let suite = registry.resolve(name).unwrap();
            let result = TestRunner::new().run(suite);
            assert!(
                result.was_successful(),
                "{} failed: {:?}",
                name,
                result.failures()
            );
            assert!(result.run_count() > 0);
        }
    }
}
