use crate::core::competence::{whole_months_between, Competence};
use crate::core::error::EngineError;
use crate::core::request::{CalculationRequest, Installment, Periodicity};
use crate::core::result::{CalculationResult, InstallmentResult, MonthlyBreakdownEntry};
use crate::core::rounding;
use crate::core::series::SeriesId;
use crate::engine::aggregate::ResultAggregator;
use crate::engine::correction::CorrectionEngine;
use crate::engine::interest::InterestEngine;
use crate::store::cache::CachedIndexStore;
use crate::store::IndexStore;
use rust_decimal::Decimal;

/// Calculation with one index series and one interest rate for the
/// whole period.
///
/// # Algorithm
///
/// 1. Without installments, the principal becomes one installment due on
///    the start date.
/// 2. Each installment is corrected from its due date to the end date by
///    its own index override, else the request's index, else not at all.
/// 3. Interest accrues from the due date on the corrected or original
///    amount.
/// 4. Installment values are summed; penalty and fee are applied on top.
/// 5. With a request-level index, a month-by-month breakdown is built
///    from that index's published values.
///
/// Any installment whose index cannot be resolved fails the whole run.
pub struct StandardCalculator;

impl StandardCalculator {
    pub fn run<S: IndexStore + ?Sized>(
        store: &S,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, EngineError> {
        request.validate()?;
        let store = CachedIndexStore::new(store);

        let mut installments = Vec::new();
        let mut total_corrected = Decimal::ZERO;
        let mut total_interest = Decimal::ZERO;

        for installment in request.effective_installments() {
            let result = Self::compute_installment(&store, request, &installment)?;
            total_corrected = checked_sum(total_corrected, result.corrected_value, "corrected")?;
            total_interest = checked_sum(total_interest, result.interest_value, "interest")?;
            installments.push(result);
        }

        let totals = ResultAggregator::totals(
            total_corrected,
            total_interest,
            request.penalty_percent,
            request.fee_percent,
        )?;

        let (correction_factor, breakdown) = match request.index_series {
            Some(series) => (
                ResultAggregator::overall_factor(total_corrected, request.principal),
                Self::breakdown(&store, request, series)?,
            ),
            None => (Decimal::ONE, Vec::new()),
        };

        let period_variation_percent = match (breakdown.first(), breakdown.last()) {
            (Some(first), Some(last)) => first
                .index_value
                .zip(last.index_value)
                .and_then(|(a, b)| ResultAggregator::variation_percent(a, b)),
            _ => None,
        };

        log::debug!(
            "standard calculation: {} installment(s), {} breakdown month(s), {} lookups",
            installments.len(),
            breakdown.len(),
            store.cached_lookups()
        );

        Ok(CalculationResult {
            original_value: request.principal,
            corrected_value: total_corrected,
            interest_value: total_interest,
            penalty_value: totals.penalty,
            fee_value: totals.fee,
            total: totals.total,
            correction_factor,
            period_variation_percent,
            installments,
            breakdown,
            warnings: Vec::new(),
        })
    }

    fn compute_installment<S: IndexStore + ?Sized>(
        store: &S,
        request: &CalculationRequest,
        installment: &Installment,
    ) -> Result<InstallmentResult, EngineError> {
        let series = installment.index_series.or(request.index_series);

        let corrected = match series {
            Some(id) => CorrectionEngine::corrected_amount(
                store,
                installment.amount,
                installment.due_date,
                request.end_date,
                id,
            )?,
            None => installment.amount,
        };

        let interest_base = if request.interest_on_corrected {
            corrected
        } else {
            installment.amount
        };

        let (interest, interest_months) = if request.interest_rate > Decimal::ZERO {
            (
                InterestEngine::interest(
                    interest_base,
                    request.interest_rate,
                    request.interest_kind,
                    installment.due_date,
                    request.end_date,
                    request.periodicity,
                )?,
                whole_months_between(installment.due_date, request.end_date),
            )
        } else {
            (Decimal::ZERO, 0)
        };

        Ok(InstallmentResult {
            description: installment.description.clone(),
            original_amount: installment.amount,
            due_date: installment.due_date,
            corrected_value: corrected,
            interest_value: interest,
            subtotal: checked_sum(corrected, interest, "subtotal")?,
            interest_months,
            index_name: series.and_then(|id| store.series_name(id)),
        })
    }

    /// Cumulative correction of the principal month by month, relative to
    /// the first published value in the period.
    fn breakdown<S: IndexStore + ?Sized>(
        store: &S,
        request: &CalculationRequest,
        series: SeriesId,
    ) -> Result<Vec<MonthlyBreakdownEntry>, EngineError> {
        let points = CorrectionEngine::points_in_range(
            store,
            series,
            Competence::from_date(request.start_date),
            Competence::from_date(request.end_date),
        );
        let Some(first) = points.first().map(|p| p.value) else {
            return Ok(Vec::new());
        };
        let index_name = store
            .series_name(series)
            .unwrap_or_else(|| series.to_string());

        let mut entries = Vec::with_capacity(points.len());
        let mut previous: Option<Decimal> = None;

        for point in &points {
            let cumulative_factor = if first.is_zero() {
                Decimal::ONE
            } else {
                rounding::factor(point.value / first)
            };
            let corrected = request
                .principal
                .checked_mul(cumulative_factor)
                .map(rounding::money)
                .ok_or(EngineError::AmountOverflow { stage: "corrected" })?;
            let variation_percent =
                previous.and_then(|prev| ResultAggregator::variation_percent(prev, point.value));
            previous = Some(point.value);

            let elapsed = whole_months_between(request.start_date, point.competence.succ().first_day());
            let interest_base = if request.interest_on_corrected {
                corrected
            } else {
                request.principal
            };
            let interest = if elapsed > 0 {
                InterestEngine::accrue(
                    interest_base,
                    request.interest_rate,
                    request.interest_kind,
                    elapsed,
                    Periodicity::Monthly,
                )?
            } else {
                Decimal::ZERO
            };

            entries.push(MonthlyBreakdownEntry {
                competence: point.competence,
                index_name: index_name.clone(),
                index_value: Some(point.value),
                variation_percent,
                cumulative_factor,
                corrected_value: corrected,
                interest_value: interest,
                subtotal: checked_sum(corrected, interest, "subtotal")?,
            });
        }
        Ok(entries)
    }
}

fn checked_sum(a: Decimal, b: Decimal, stage: &'static str) -> Result<Decimal, EngineError> {
    a.checked_add(b).ok_or(EngineError::AmountOverflow { stage })
}
