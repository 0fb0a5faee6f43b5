//! The application under test

use crate::error::{CalcError, CalcResult};
use crate::service::CalculatorService;
use std::fmt;
use std::sync::Arc;

/// Arithmetic front-end that delegates every operation to its injected
/// [`CalculatorService`].
#[derive(Clone, Default)]
pub struct MathApplication {
    service: Option<Arc<dyn CalculatorService>>,
}

impl MathApplication {
    /// Create an application with the service injected through the constructor
    pub fn new(service: Arc<dyn CalculatorService>) -> Self {
        Self {
            service: Some(service),
        }
    }

    /// Inject (or replace) the calculator service
    pub fn set_calculator_service(&mut self, service: Arc<dyn CalculatorService>) {
        self.service = Some(service);
    }

    /// Whether a service has been injected
    pub fn has_service(&self) -> bool {
        self.service.is_some()
    }

    pub fn add(&self, lhs: f64, rhs: f64) -> CalcResult<f64> {
        self.service()?.add(lhs, rhs)
    }

    pub fn subtract(&self, lhs: f64, rhs: f64) -> CalcResult<f64> {
        self.service()?.subtract(lhs, rhs)
    }

    pub fn multiply(&self, lhs: f64, rhs: f64) -> CalcResult<f64> {
        self.service()?.multiply(lhs, rhs)
    }

    pub fn divide(&self, lhs: f64, rhs: f64) -> CalcResult<f64> {
        self.service()?.divide(lhs, rhs)
    }

    fn service(&self) -> CalcResult<&dyn CalculatorService> {
        self.service.as_deref().ok_or(CalcError::ServiceNotInjected)
    }
}

impl fmt::Debug for MathApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MathApplication")
            .field("has_service", &self.has_service())
            .finish()
    }
}
