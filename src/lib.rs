//! # correction-engine
//!
//! Monetary correction and interest engine for legal claims.
//!
//! Given a claim (a principal or a list of installments), a date range
//! and published monthly index values, the engine computes the corrected
//! value, accrued interest, penalty, fees and an auditable month-by-month
//! breakdown. Claims against the public treasury follow the statutory
//! sequence of indices and interest rules instead of a user-chosen index.
//!
//! ## Architecture
//!
//! - **core**: Competences, index series, requests, results, rounding, errors
//! - **store**: Read-only index store contract, in-memory store, per-request cache
//! - **engine**: Correction factors, interest, result aggregation
//! - **calculation**: Standard and legislative orchestration, regime schedule
//! - **simulation**: Synthetic index series for benchmarks and demos

pub mod calculation;
pub mod core;
pub mod engine;
pub mod simulation;
pub mod store;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::calculation::legislative::LegislativeCalculator;
    pub use crate::calculation::regime::{LegislativeConfig, Regime};
    pub use crate::calculation::{run, run_legislative, run_standard};
    pub use crate::core::competence::Competence;
    pub use crate::core::error::{EngineError, ErrorCategory};
    pub use crate::core::request::{
        CalculationMode, CalculationRequest, Installment, InterestKind, Periodicity,
    };
    pub use crate::core::result::{CalculationResult, Diagnostic, MonthlyBreakdownEntry};
    pub use crate::core::series::{IndexSeries, Provenance, SeriesId, SeriesSource};
    pub use crate::store::memory::InMemoryIndexStore;
    pub use crate::store::IndexStore;
}
