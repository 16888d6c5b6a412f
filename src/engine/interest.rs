use crate::core::competence::{days_between, whole_months_between, whole_years_between};
use crate::core::error::EngineError;
use crate::core::request::{InterestKind, Periodicity};
use crate::core::rounding;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

/// Days in the conventional month used to derive daily rates.
const DAYS_PER_MONTH: Decimal = dec!(30);
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Simple and compound interest over whole calendar periods.
///
/// Rates are monthly percentages. For daily accrual the monthly rate is
/// divided by a flat 30; for annual accrual it is multiplied by 12.
pub struct InterestEngine;

impl InterestEngine {
    /// Interest on `principal` from `from` to `to`, rounded to cents.
    ///
    /// Zero when the principal or the rate is not positive. Fails with
    /// [`EngineError::AmountOverflow`] when the interest does not fit in a
    /// decimal.
    pub fn interest(
        principal: Decimal,
        rate_percent: Decimal,
        kind: InterestKind,
        from: NaiveDate,
        to: NaiveDate,
        periodicity: Periodicity,
    ) -> Result<Decimal, EngineError> {
        let periods = Self::periods_between(from, to, periodicity);
        Self::accrue(principal, rate_percent, kind, periods, periodicity)
    }

    /// Interest for an already-counted number of periods.
    pub fn accrue(
        principal: Decimal,
        rate_percent: Decimal,
        kind: InterestKind,
        periods: i64,
        periodicity: Periodicity,
    ) -> Result<Decimal, EngineError> {
        if principal <= Decimal::ZERO || rate_percent <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        let rate = Self::rescale(rounding::percent_to_fraction(rate_percent), periodicity);

        let interest = match kind {
            InterestKind::Simple => principal
                .checked_mul(rate)
                .and_then(|v| v.checked_mul(Decimal::from(periods))),
            InterestKind::Compound => {
                if periods <= 0 {
                    return Ok(Decimal::ZERO);
                }
                compound_growth(Decimal::ONE + rate, periods as u64)
                    .and_then(|growth| principal.checked_mul(growth))
                    .and_then(|amount| amount.checked_sub(principal))
            }
        };
        interest
            .map(rounding::money)
            .ok_or(EngineError::AmountOverflow { stage: "interest" })
    }

    /// Interest proportional to elapsed days at a monthly rate.
    ///
    /// A 30-day span yields exactly one month of simple interest.
    pub fn pro_rata_die(principal: Decimal, monthly_rate_percent: Decimal, days: i64) -> Decimal {
        if principal <= Decimal::ZERO || monthly_rate_percent <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let daily = rounding::ratio(rounding::percent_to_fraction(monthly_rate_percent) / DAYS_PER_MONTH);
        rounding::money(principal * daily * Decimal::from(days))
    }

    /// Whole periods from `from` to `to` in the unit of `periodicity`.
    pub fn periods_between(from: NaiveDate, to: NaiveDate, periodicity: Periodicity) -> i64 {
        match periodicity {
            Periodicity::Daily => days_between(from, to),
            Periodicity::Monthly => whole_months_between(from, to),
            Periodicity::Annual => whole_years_between(from, to),
        }
    }

    fn rescale(monthly_rate: Decimal, periodicity: Periodicity) -> Decimal {
        match periodicity {
            Periodicity::Daily => rounding::ratio(monthly_rate / DAYS_PER_MONTH),
            Periodicity::Monthly => monthly_rate,
            Periodicity::Annual => monthly_rate * MONTHS_PER_YEAR,
        }
    }
}

/// `base^periods`, exact where the decimal range allows, `f64` otherwise.
///
/// `None` when even the approximation is outside the decimal range.
fn compound_growth(base: Decimal, periods: u64) -> Option<Decimal> {
    if let Some(exact) = base.checked_powu(periods) {
        return Some(exact);
    }
    log::warn!(
        "decimal overflow raising {} to {}; using floating-point approximation",
        base,
        periods
    );
    let approx = base.to_f64()?.powf(periods as f64);
    Decimal::from_f64_retain(approx)
}
