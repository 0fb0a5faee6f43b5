//! Calculator application
//!
//! `MathApplication` performs arithmetic by delegating to a
//! [`CalculatorService`]. The service is injected from outside, either
//! through the constructor or the setter, so tests can swap in a
//! [`mock::MockCalculatorService`] and check how the application talks to
//! its collaborator.
//!
//! # Example
//!
//! ```
//! use calc_app::mock::{MockCalculatorService, Operation};
//! use calc_app::MathApplication;
//! use std::sync::Arc;
//!
//! let service = Arc::new(MockCalculatorService::new());
//! service.when(Operation::Add, 10.0, 20.0).then_return(30.0);
//!
//! let app = MathApplication::new(service.clone());
//! assert_eq!(app.add(10.0, 20.0).unwrap(), 30.0);
//! service.verify(Operation::Add, 10.0, 20.0, calc_app::mock::times(1)).unwrap();
//! ```

pub mod application;
pub mod error;
pub mod mock;
pub mod service;

pub use application::MathApplication;
pub use error::{CalcError, CalcResult};
pub use service::{CalculatorService, StandardCalculator};
