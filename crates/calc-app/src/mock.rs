//! Stub-and-verify test double for [`CalculatorService`]
//!
//! A `MockCalculatorService` answers calls with stubbed values, records every
//! call it receives, and lets a test verify those calls afterwards:
//!
//! - `when(op, lhs, rhs).then_return(v)` / `.then_fail(msg)` stubs a call
//! - unstubbed calls answer `Ok(0.0)`
//! - `verify(op, lhs, rhs, times(n))` checks how often a call happened
//! - `verify_in_order(..)` checks that calls happened in a given order
//! - `verify_no_more_interactions()` checks nothing went unverified
//!
//! Plain `verify` does not care about call order.

use crate::error::{CalcError, CalcResult};
use crate::service::CalculatorService;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// A `CalculatorService` method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single call: operation plus operands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Invocation {
    pub operation: Operation,
    pub lhs: f64,
    pub rhs: f64,
}

impl Invocation {
    pub fn new(operation: Operation, lhs: f64, rhs: f64) -> Self {
        Self { operation, lhs, rhs }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}, {:?})", self.operation, self.lhs, self.rhs)
    }
}

/// Shorthand for building an [`Invocation`]
pub fn call(operation: Operation, lhs: f64, rhs: f64) -> Invocation {
    Invocation::new(operation, lhs, rhs)
}

/// How many times a call is expected to have happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Times {
    Exactly(usize),
    AtLeast(usize),
    AtMost(usize),
}

impl Times {
    /// Check an observed call count against this expectation
    pub fn matches(&self, count: usize) -> bool {
        match *self {
            Times::Exactly(n) => count == n,
            Times::AtLeast(n) => count >= n,
            Times::AtMost(n) => count <= n,
        }
    }
}

impl fmt::Display for Times {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (prefix, n) = match *self {
            Times::Exactly(n) => ("", n),
            Times::AtLeast(n) => ("at least ", n),
            Times::AtMost(n) => ("at most ", n),
        };
        let noun = if n == 1 { "invocation" } else { "invocations" };
        write!(f, "{}{} {}", prefix, n, noun)
    }
}

pub fn times(n: usize) -> Times {
    Times::Exactly(n)
}

pub fn never() -> Times {
    Times::Exactly(0)
}

pub fn at_least(n: usize) -> Times {
    Times::AtLeast(n)
}

pub fn at_most(n: usize) -> Times {
    Times::AtMost(n)
}

/// Verification failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VerificationError {
    #[error("wanted {wanted} of {invocation} but was {actual}")]
    WrongCount {
        invocation: Invocation,
        wanted: Times,
        actual: usize,
    },

    #[error("wanted {wanted} at position {position} of the expected order but it was not invoked there")]
    OutOfOrder { wanted: Invocation, position: usize },

    #[error("no more interactions wanted but found {count} unverified, starting with {first}")]
    UnverifiedInteractions { first: Invocation, count: usize },
}

#[derive(Debug, Clone, PartialEq)]
enum Answer {
    Return(f64),
    Fail(String),
}

#[derive(Debug)]
struct Recorded {
    invocation: Invocation,
    verified: bool,
}

#[derive(Debug, Default)]
struct State {
    stubs: Vec<(Invocation, Answer)>,
    recorded: Vec<Recorded>,
}

/// Mock implementation of [`CalculatorService`]
#[derive(Debug, Default)]
pub struct MockCalculatorService {
    state: Mutex<State>,
}

/// Pending stub created by [`MockCalculatorService::when`]
#[must_use = "a stub does nothing until then_return or then_fail is called"]
pub struct Stubbing<'a> {
    mock: &'a MockCalculatorService,
    invocation: Invocation,
}

impl Stubbing<'_> {
    /// Answer the stubbed call with `value`
    pub fn then_return(self, value: f64) {
        self.mock.stub(self.invocation, Answer::Return(value));
    }

    /// Answer the stubbed call with `CalcError::Service(message)`
    pub fn then_fail(self, message: impl Into<String>) {
        self.mock.stub(self.invocation, Answer::Fail(message.into()));
    }
}

impl MockCalculatorService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start stubbing a call
    pub fn when(&self, operation: Operation, lhs: f64, rhs: f64) -> Stubbing<'_> {
        Stubbing {
            mock: self,
            invocation: Invocation::new(operation, lhs, rhs),
        }
    }

    /// All recorded calls, oldest first
    pub fn invocations(&self) -> Vec<Invocation> {
        self.lock().recorded.iter().map(|r| r.invocation).collect()
    }

    /// Number of recorded calls matching `operation(lhs, rhs)`
    pub fn invocation_count(&self, operation: Operation, lhs: f64, rhs: f64) -> usize {
        let wanted = Invocation::new(operation, lhs, rhs);
        self.lock()
            .recorded
            .iter()
            .filter(|r| r.invocation == wanted)
            .count()
    }

    /// Verify how many times `operation(lhs, rhs)` was called
    pub fn verify(
        &self,
        operation: Operation,
        lhs: f64,
        rhs: f64,
        wanted: Times,
    ) -> Result<(), VerificationError> {
        let invocation = Invocation::new(operation, lhs, rhs);
        let mut state = self.lock();

        let actual = state
            .recorded
            .iter()
            .filter(|r| r.invocation == invocation)
            .count();

        if !wanted.matches(actual) {
            return Err(VerificationError::WrongCount {
                invocation,
                wanted,
                actual,
            });
        }

        for recorded in state
            .recorded
            .iter_mut()
            .filter(|r| r.invocation == invocation)
        {
            recorded.verified = true;
        }
        Ok(())
    }

    /// Verify that `expected` occurred in this order.
    ///
    /// Other calls may be interleaved; only the relative order of the listed
    /// calls is checked.
    pub fn verify_in_order(&self, expected: &[Invocation]) -> Result<(), VerificationError> {
        let mut state = self.lock();
        let mut matched = Vec::with_capacity(expected.len());
        let mut cursor = 0;

        for (position, wanted) in expected.iter().enumerate() {
            let found = state.recorded[cursor..]
                .iter()
                .position(|r| r.invocation == *wanted)
                .map(|offset| cursor + offset);

            match found {
                Some(index) => {
                    matched.push(index);
                    cursor = index + 1;
                }
                None => {
                    return Err(VerificationError::OutOfOrder {
                        wanted: *wanted,
                        position,
                    })
                }
            }
        }

        for index in matched {
            state.recorded[index].verified = true;
        }
        Ok(())
    }

    /// Fail if any recorded call was not covered by an earlier verification
    pub fn verify_no_more_interactions(&self) -> Result<(), VerificationError> {
        let state = self.lock();
        let mut unverified = state.recorded.iter().filter(|r| !r.verified);

        match unverified.next() {
            Some(first) => Err(VerificationError::UnverifiedInteractions {
                first: first.invocation,
                count: 1 + unverified.count(),
            }),
            None => Ok(()),
        }
    }

    /// Forget all stubs and recorded calls
    pub fn reset(&self) {
        let mut state = self.lock();
        state.stubs.clear();
        state.recorded.clear();
    }

    fn stub(&self, invocation: Invocation, answer: Answer) {
        let mut state = self.lock();
        state.stubs.retain(|(stubbed, _)| *stubbed != invocation);
        state.stubs.push((invocation, answer));
    }

    fn invoke(&self, operation: Operation, lhs: f64, rhs: f64) -> CalcResult<f64> {
        let invocation = Invocation::new(operation, lhs, rhs);
        let mut state = self.lock();

        state.recorded.push(Recorded {
            invocation,
            verified: false,
        });

        let answer = state
            .stubs
            .iter()
            .find(|(stubbed, _)| *stubbed == invocation)
            .map(|(_, answer)| answer.clone());

        match answer {
            Some(Answer::Return(value)) => Ok(value),
            Some(Answer::Fail(message)) => Err(CalcError::Service(message)),
            None => Ok(0.0),
        }
    }

    // A poisoned lock only means another test thread panicked mid-call;
    // the recorded state is still usable.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CalculatorService for MockCalculatorService {
    fn add(&self, lhs: f64, rhs: f64) -> CalcResult<f64> {
        self.invoke(Operation::Add, lhs, rhs)
    }

    fn subtract(&self, lhs: f64, rhs: f64) -> CalcResult<f64> {
        self.invoke(Operation::Subtract, lhs, rhs)
    }

    fn multiply(&self, lhs: f64, rhs: f64) -> CalcResult<f64> {
        self.invoke(Operation::Multiply, lhs, rhs)
    }

    fn divide(&self, lhs: f64, rhs: f64) -> CalcResult<f64> {
        self.invoke(Operation::Divide, lhs, rhs)
    }
}
