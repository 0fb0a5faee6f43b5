//! Calculator service contract and its standard implementation

use crate::error::{CalcError, CalcResult};

/// The collaborator `MathApplication` delegates arithmetic to.
///
/// Implementations must be shareable across threads so a single instance
/// can be injected into an application and still be inspected by a test.
pub trait CalculatorService: Send + Sync {
    fn add(&self, lhs: f64, rhs: f64) -> CalcResult<f64>;
    fn subtract(&self, lhs: f64, rhs: f64) -> CalcResult<f64>;
    fn multiply(&self, lhs: f64, rhs: f64) -> CalcResult<f64>;
    fn divide(&self, lhs: f64, rhs: f64) -> CalcResult<f64>;
}

/// Plain floating point calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCalculator;

impl StandardCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl CalculatorService for StandardCalculator {
    fn add(&self, lhs: f64, rhs: f64) -> CalcResult<f64> {
        Ok(lhs + rhs)
    }

    fn subtract(&self, lhs: f64, rhs: f64) -> CalcResult<f64> {
        Ok(lhs - rhs)
    }

    fn multiply(&self, lhs: f64, rhs: f64) -> CalcResult<f64> {
        Ok(lhs * rhs)
    }

    fn divide(&self, lhs: f64, rhs: f64) -> CalcResult<f64> {
        if rhs == 0.0 {
            return Err(CalcError::DivisionByZero);
        }
        Ok(lhs / rhs)
    }
}
