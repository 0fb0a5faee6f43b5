//! Test runner - execute a suite and collect failures

use crate::testing::suite::{TestCase, TestSuite};
use rayon::prelude::*;
use serde::Serialize;
use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use std::time::{Duration, Instant};
use tracing::{debug, info};

thread_local! {
    /// Set while this thread is executing a test body
    static IN_TEST_BODY: Cell<bool> = const { Cell::new(false) };
}

static INSTALL_PANIC_FILTER: Once = Once::new();

/// Outcome of a single test
#[derive(Debug, Clone, PartialEq)]
pub enum TestOutcome {
    /// Test passed
    Pass { duration: Duration },
    /// Test returned an assertion error or panicked
    Fail { message: String, duration: Duration },
    /// Test was declared ignored and not executed
    Ignored,
}

impl TestOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestOutcome::Pass { .. })
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, TestOutcome::Ignored)
    }

    pub fn duration(&self) -> Duration {
        match self {
            TestOutcome::Pass { duration } => *duration,
            TestOutcome::Fail { duration, .. } => *duration,
            TestOutcome::Ignored => Duration::ZERO,
        }
    }
}

/// A completed test
#[derive(Debug, Clone)]
pub struct TestRun {
    /// Name of the test that ran
    pub name: String,
    pub outcome: TestOutcome,
}

/// A failed test: which test, and why
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub test: String,
    pub suite: String,
    pub message: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}): {}", self.test, self.suite, self.message)
    }
}

/// Result of running one suite
///
/// Success is derived from the failure list and never stored on its own.
#[derive(Debug, Clone)]
pub struct RunResult {
    suite: String,
    runs: Vec<TestRun>,
    failures: Vec<Failure>,
    run_time: Duration,
}

impl RunResult {
    fn new(suite: &str, runs: Vec<TestRun>, run_time: Duration) -> Self {
        let failures = runs
            .iter()
            .filter_map(|run| match &run.outcome {
                TestOutcome::Fail { message, .. } => Some(Failure {
                    test: run.name.clone(),
                    suite: suite.to_string(),
                    message: message.clone(),
                }),
                _ => None,
            })
            .collect();

        Self {
            suite: suite.to_string(),
            runs,
            failures,
            run_time,
        }
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Every test, in declaration order
    pub fn runs(&self) -> &[TestRun] {
        &self.runs
    }

    /// Failures, in declaration order
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn pass_count(&self) -> usize {
        self.runs.iter().filter(|r| r.outcome.is_pass()).count()
    }

    /// Number of tests actually executed
    pub fn run_count(&self) -> usize {
        self.runs.iter().filter(|r| !r.outcome.is_ignored()).count()
    }

    pub fn ignore_count(&self) -> usize {
        self.runs.iter().filter(|r| r.outcome.is_ignored()).count()
    }

    /// Wall-clock time of the whole run
    pub fn run_time(&self) -> Duration {
        self.run_time
    }

    pub fn was_successful(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Test runner with configuration
#[derive(Debug, Default)]
pub struct TestRunner {
    /// Whether to run tests on the rayon pool
    parallel: bool,
}

impl TestRunner {
    /// Create a sequential runner
    pub fn new() -> Self {
        Self { parallel: false }
    }

    /// Set whether to run tests in parallel
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run every test in the suite
    pub fn run(&self, suite: &TestSuite) -> RunResult {
        info!(suite = %suite.name, tests = suite.len(), parallel = self.parallel, "running suite");
        let start = Instant::now();

        install_panic_filter();

        let runs: Vec<TestRun> = if self.parallel {
            suite
                .tests
                .par_iter()
                .map(|test| run_single_test(&suite.name, test))
                .collect()
        } else {
            suite
                .tests
                .iter()
                .map(|test| run_single_test(&suite.name, test))
                .collect()
        };

        let result = RunResult::new(&suite.name, runs, start.elapsed());
        info!(
            suite = %suite.name,
            run = result.run_count(),
            failed = result.failure_count(),
            ignored = result.ignore_count(),
            "suite finished"
        );
        result
    }
}

/// Run a single test, turning errors and panics into a failed outcome
fn run_single_test(suite: &str, test: &TestCase) -> TestRun {
    if test.ignored {
        info!(suite, test = %test.name, "test ignored");
        return TestRun {
            name: test.name.clone(),
            outcome: TestOutcome::Ignored,
        };
    }

    debug!(suite, test = %test.name, "running test");
    let start = Instant::now();

    IN_TEST_BODY.with(|flag| flag.set(true));
    let caught = panic::catch_unwind(AssertUnwindSafe(test.func));
    IN_TEST_BODY.with(|flag| flag.set(false));

    let outcome = match caught {
        Ok(Ok(())) => TestOutcome::Pass {
            duration: start.elapsed(),
        },
        Ok(Err(err)) => TestOutcome::Fail {
            message: err.message().to_string(),
            duration: start.elapsed(),
        },
        Err(payload) => TestOutcome::Fail {
            message: panic_message(payload.as_ref()),
            duration: start.elapsed(),
        },
    };

    if let TestOutcome::Fail { message, .. } = &outcome {
        debug!(suite, test = %test.name, reason = %message, "test failed");
    }

    TestRun {
        name: test.name.clone(),
        outcome,
    }
}

/// Wrap the process panic hook, once, so panics raised inside a test body
/// stay off stderr. Panics on any other thread still reach the previous hook.
fn install_panic_filter() {
    INSTALL_PANIC_FILTER.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !in_test_body() {
                previous(info);
            }
        }));
    });
}

fn in_test_body() -> bool {
    IN_TEST_BODY.with(Cell::get)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::assertions::{check, check_eq, AssertionError, TestResult};
    use pretty_assertions::assert_eq;

    fn passing() -> TestResult {
        Ok(())
    }

    fn two_plus_two_is_five() -> TestResult {
        check_eq(5, 2 + 2)
    }

    fn panicking() -> TestResult {
        panic!("index out of bounds");
    }

    fn reports_test_body_flag() -> TestResult {
        check(in_test_body(), "flag should be set inside a test body")?;

        let other_thread = std::thread::spawn(in_test_body)
            .join()
            .map_err(|_| AssertionError::new("helper thread panicked"))?;
        check(!other_thread, "flag should not leak to other threads")
    }

    #[test]
    fn test_panic_filter_only_covers_test_bodies() {
        let suite = TestSuite::new("Flag")
            .with_test("test_flag", reports_test_body_flag)
            .with_test("test_panics", panicking);
        let result = TestRunner::new().run(&suite);

        assert_eq!(result.failure_count(), 1);
        assert_eq!(result.failures()[0].test, "test_panics");
        assert!(!in_test_body());
    }

    #[test]
    fn test_empty_suite_is_successful() {
        let result = TestRunner::new().run(&TestSuite::new("Empty"));

        assert!(result.was_successful());
        assert_eq!(result.run_count(), 0);
        assert!(result.failures().is_empty());
    }

    #[test]
    fn test_single_passing_test() {
        let suite = TestSuite::new("Passing").with_test("test_pass", passing);
        let result = TestRunner::new().run(&suite);

        assert!(result.was_successful());
        assert_eq!(result.run_count(), 1);
    }

    #[test]
    fn test_single_failing_test() {
        let suite = TestSuite::new("Arithmetic").with_test("test_sum", two_plus_two_is_five);
        let result = TestRunner::new().run(&suite);

        assert!(!result.was_successful());
        assert_eq!(
            result.failures(),
            &[Failure {
                test: "test_sum".to_string(),
                suite: "Arithmetic".to_string(),
                message: "expected:<5> but was:<4>".to_string(),
            }]
        );
        assert_eq!(
            result.failures()[0].to_string(),
            "test_sum(Arithmetic): expected:<5> but was:<4>"
        );
    }

    #[test]
    fn test_panic_becomes_failure() {
        let suite = TestSuite::new("Panics").with_test("test_panics", panicking);
        let result = TestRunner::new().run(&suite);

        assert_eq!(result.failure_count(), 1);
        assert_eq!(
            result.failures()[0].message,
            "panicked: index out of bounds"
        );
    }

    #[test]
    fn test_failures_keep_declaration_order() {
        let suite = TestSuite::new("Mixed")
            .with_test("test_first_fail", two_plus_two_is_five)
            .with_test("test_pass", passing)
            .with_test("test_second_fail", panicking)
            .with_test("test_third_fail", two_plus_two_is_five);

        for parallel in [false, true] {
            let result = TestRunner::new().with_parallel(parallel).run(&suite);
            let names: Vec<_> = result.failures().iter().map(|f| f.test.as_str()).collect();

            assert_eq!(
                names,
                vec!["test_first_fail", "test_second_fail", "test_third_fail"]
            );
            assert_eq!(result.run_count(), 4);
        }
    }

    #[test]
    fn test_ignored_tests_are_not_run() {
        let suite = TestSuite::new("Ignoring")
            .with_test("test_pass", passing)
            .with_ignored("test_broken", two_plus_two_is_five);
        let result = TestRunner::new().run(&suite);

        assert!(result.was_successful());
        assert_eq!(result.run_count(), 1);
        assert_eq!(result.ignore_count(), 1);
        assert!(result.runs()[1].outcome.is_ignored());
    }

    #[test]
    fn test_success_matches_failure_list() {
        let suites = [
            TestSuite::new("A"),
            TestSuite::new("B").with_test("test_pass", passing),
            TestSuite::new("C").with_test("test_fail", two_plus_two_is_five),
            TestSuite::new("D")
                .with_test("test_fail", two_plus_two_is_five)
                .with_test("test_pass", passing),
        ];

        for suite in &suites {
            let result = TestRunner::new().run(suite);
            assert_eq!(result.was_successful(), result.failures().is_empty());
        }
    }

    #[test]
    fn test_rerun_gives_same_outcome() {
        let suite = TestSuite::new("Repeat")
            .with_test("test_pass", passing)
            .with_test("test_fail", two_plus_two_is_five);
        let runner = TestRunner::new();

        let first = runner.run(&suite);
        let second = runner.run(&suite);

        assert_eq!(first.was_successful(), second.was_successful());
        assert_eq!(first.failures(), second.failures());
    }

    #[test]
    fn test_outcome_duration() {
        let pass = TestOutcome::Pass {
            duration: Duration::from_millis(100),
        };
        assert_eq!(pass.duration(), Duration::from_millis(100));

        let fail = TestOutcome::Fail {
            message: "error".to_string(),
            duration: Duration::from_millis(50),
        };
        assert_eq!(fail.duration(), Duration::from_millis(50));
        assert_eq!(TestOutcome::Ignored.duration(), Duration::ZERO);
    }
}
