//! Test runner infrastructure
//!
//! Suites are registered up front and looked up by name. The runner executes
//! a suite's tests in declaration order, turns failed assertions and panics
//! into [`Failure`] records, and the reporter prints them.

pub mod assertions;
pub mod reporter;
pub mod runner;
pub mod suite;

pub use reporter::{OutputFormat, TestReporter};
pub use runner::{RunResult, TestRunner};
pub use suite::{SuiteRegistry, TestSuite};

use thiserror::Error;

/// Structural errors: the requested suite cannot be run at all
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunnerError {
    #[error("test suite '{name}' not found (available: {})", .available.join(", "))]
    SuiteNotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("test suite '{0}' is already registered")]
    DuplicateSuite(String),

    #[error("test suite '{suite}' contains a test with an empty name")]
    EmptyTestName { suite: String },

    #[error("test suite '{suite}' declares test '{test}' more than once")]
    DuplicateTest { suite: String, test: String },
}
