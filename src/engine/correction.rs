use crate::core::competence::Competence;
use crate::core::error::EngineError;
use crate::core::rounding;
use crate::core::series::{IndexPoint, SeriesId};
use crate::store::IndexStore;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Monetary correction between two dates using one index series.
///
/// The base index is the one published for the month *before* the
/// starting month (the amount is worth its face value at the start of
/// that month); the final index is the one for the month of the end date.
pub struct CorrectionEngine;

impl CorrectionEngine {
    /// Dimensionless factor `index(to) / index(from - 1 month)`, at 10
    /// fractional digits.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidRange`] if `from > to`.
    /// - [`EngineError::IndexNotFound`] if either competence has no value
    ///   at or before it.
    /// - [`EngineError::ZeroBaseIndex`] if the base value is zero.
    pub fn correction_factor<S: IndexStore + ?Sized>(
        store: &S,
        series: SeriesId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Decimal, EngineError> {
        if from > to {
            return Err(EngineError::InvalidRange { from, to });
        }

        let base_competence = Competence::from_date(from).pred();
        let final_competence = Competence::from_date(to);

        let base = Self::resolve(store, series, base_competence)?;
        let last = Self::resolve(store, series, final_competence)?;

        rounding::checked_ratio(last, base).ok_or(EngineError::ZeroBaseIndex {
            series,
            competence: base_competence,
        })
    }

    /// `amount` corrected from `from` to `to`, rounded to cents.
    ///
    /// Non-positive amounts are returned unchanged without consulting the
    /// store.
    pub fn corrected_amount<S: IndexStore + ?Sized>(
        store: &S,
        amount: Decimal,
        from: NaiveDate,
        to: NaiveDate,
        series: SeriesId,
    ) -> Result<Decimal, EngineError> {
        if amount <= Decimal::ZERO {
            return Ok(amount);
        }
        let factor = Self::correction_factor(store, series, from, to)?;
        amount
            .checked_mul(factor)
            .map(rounding::money)
            .ok_or(EngineError::AmountOverflow { stage: "corrected" })
    }

    /// Index points for every month from `from` to `to`, inclusive.
    /// An empty list means no data, not an error.
    pub fn points_in_range<S: IndexStore + ?Sized>(
        store: &S,
        series: SeriesId,
        from: Competence,
        to: Competence,
    ) -> Vec<IndexPoint> {
        store.lookup_range(series, from, to)
    }

    fn resolve<S: IndexStore + ?Sized>(
        store: &S,
        series: SeriesId,
        competence: Competence,
    ) -> Result<Decimal, EngineError> {
        store
            .lookup_at_or_before(series, competence)
            .ok_or(EngineError::IndexNotFound { series, competence })
    }
}
