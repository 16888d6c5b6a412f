//! Calculation entry points.
//!
//! [`run_standard`] applies one index and one interest rate to a claim;
//! [`run_legislative`] follows the statutory regime history for claims
//! against the public treasury. [`run`] picks between them by the
//! request's [`CalculationMode`].

pub mod legislative;
pub mod regime;
pub mod standard;

use crate::core::error::EngineError;
use crate::core::request::{CalculationMode, CalculationRequest};
use crate::core::result::CalculationResult;
use crate::store::IndexStore;
use legislative::LegislativeCalculator;
use standard::StandardCalculator;

pub fn run_standard<S: IndexStore + ?Sized>(
    store: &S,
    request: &CalculationRequest,
) -> Result<CalculationResult, EngineError> {
    StandardCalculator::run(store, request)
}

/// Legislative calculation under the default federal legislation. Use
/// [`LegislativeCalculator::new`] for a different configuration.
pub fn run_legislative<S: IndexStore + ?Sized>(
    store: &S,
    request: &CalculationRequest,
) -> Result<CalculationResult, EngineError> {
    LegislativeCalculator::default().run(store, request)
}

pub fn run<S: IndexStore + ?Sized>(
    store: &S,
    request: &CalculationRequest,
) -> Result<CalculationResult, EngineError> {
    match request.mode {
        CalculationMode::Standard => run_standard(store, request),
        CalculationMode::Legislative => run_legislative(store, request),
    }
}
