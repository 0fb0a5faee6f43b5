//! Test suites and the registry they are looked up in

use crate::testing::assertions::TestResult;
use crate::testing::RunnerError;
use std::collections::HashSet;

/// Body of a test case
pub type TestFn = fn() -> TestResult;

/// A single named test
#[derive(Debug, Clone)]
pub struct TestCase {
    /// Test name, reported in failures (e.g., "test_add")
    pub name: String,
    /// The test body
    pub func: TestFn,
    /// Ignored tests are reported but never executed
    pub ignored: bool,
}

impl TestCase {
    pub fn new(name: impl Into<String>, func: TestFn) -> Self {
        Self {
            name: name.into(),
            func,
            ignored: false,
        }
    }

    pub fn ignored(name: impl Into<String>, func: TestFn) -> Self {
        Self {
            ignored: true,
            ..Self::new(name, func)
        }
    }
}

/// A named, ordered collection of tests
#[derive(Debug, Clone)]
pub struct TestSuite {
    /// Suite name, used for lookup and in failure descriptions
    pub name: String,
    /// Tests in declaration order
    pub tests: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
        }
    }

    /// Append a test
    pub fn with_test(mut self, name: impl Into<String>, func: TestFn) -> Self {
        self.tests.push(TestCase::new(name, func));
        self
    }

    /// Append a test that is declared but not run
    pub fn with_ignored(mut self, name: impl Into<String>, func: TestFn) -> Self {
        self.tests.push(TestCase::ignored(name, func));
        self
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Reject suites that cannot be reported unambiguously
    pub fn validate(&self) -> Result<(), RunnerError> {
        let mut seen = HashSet::new();

        for test in &self.tests {
            if test.name.trim().is_empty() {
                return Err(RunnerError::EmptyTestName {
                    suite: self.name.clone(),
                });
            }
            if !seen.insert(test.name.as_str()) {
                return Err(RunnerError::DuplicateTest {
                    suite: self.name.clone(),
                    test: test.name.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Suites known to the runner, in registration order
#[derive(Debug, Default)]
pub struct SuiteRegistry {
    suites: Vec<TestSuite>,
}

impl SuiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a suite under its own name
    pub fn register(&mut self, suite: TestSuite) -> Result<(), RunnerError> {
        if self.suites.iter().any(|s| s.name == suite.name) {
            return Err(RunnerError::DuplicateSuite(suite.name));
        }
        self.suites.push(suite);
        Ok(())
    }

    /// Look up a suite by name and check that it is runnable
    pub fn resolve(&self, name: &str) -> Result<&TestSuite, RunnerError> {
        let suite = self
            .suites
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| RunnerError::SuiteNotFound {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })?;

        suite.validate()?;
        Ok(suite)
    }

    /// Registered suite names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.suites.iter().map(|s| s.name.as_str())
    }
}
