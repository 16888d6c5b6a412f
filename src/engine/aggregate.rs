use crate::core::error::EngineError;
use crate::core::rounding::{self, HUNDRED};
use rust_decimal::Decimal;

/// Penalty, fee and grand total on top of the corrected + interest subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub penalty: Decimal,
    pub fee: Decimal,
    pub total: Decimal,
}

/// Summary arithmetic shared by both orchestrators. A zero base yields
/// "no variation" instead of an error; only totals outside the decimal
/// range fail.
pub struct ResultAggregator;

impl ResultAggregator {
    /// Penalty is a percentage of the subtotal; the fee is a percentage of
    /// subtotal plus penalty. Both rounded to cents.
    pub fn totals(
        corrected: Decimal,
        interest: Decimal,
        penalty_percent: Decimal,
        fee_percent: Decimal,
    ) -> Result<Totals, EngineError> {
        let overflow = || EngineError::AmountOverflow { stage: "total" };
        let subtotal = corrected.checked_add(interest).ok_or_else(overflow)?;
        let penalty = Self::percentage_of(subtotal, penalty_percent).ok_or_else(overflow)?;
        let with_penalty = subtotal.checked_add(penalty).ok_or_else(overflow)?;
        let fee = Self::percentage_of(with_penalty, fee_percent).ok_or_else(overflow)?;
        Ok(Totals {
            subtotal,
            penalty,
            fee,
            total: with_penalty.checked_add(fee).ok_or_else(overflow)?,
        })
    }

    /// `value / base` at 6 places, or 1 when the base is not positive.
    pub fn overall_factor(value: Decimal, base: Decimal) -> Decimal {
        if base <= Decimal::ZERO {
            return Decimal::ONE;
        }
        rounding::factor(value / base)
    }

    /// Percent change from `first` to `last` at 4 places; none for a zero base.
    pub fn variation_percent(first: Decimal, last: Decimal) -> Option<Decimal> {
        if first.is_zero() {
            return None;
        }
        let change = rounding::factor((last - first) / first);
        Some(rounding::percent(change * HUNDRED))
    }

    /// Percent growth implied by a factor; none unless it exceeds 1.
    pub fn factor_variation(factor: Decimal) -> Option<Decimal> {
        if factor <= Decimal::ONE {
            return None;
        }
        Some(rounding::percent((factor - Decimal::ONE) * HUNDRED))
    }

    fn percentage_of(base: Decimal, percent: Decimal) -> Option<Decimal> {
        if percent <= Decimal::ZERO {
            return Some(Decimal::ZERO);
        }
        base.checked_mul(percent).map(|v| rounding::money(v / HUNDRED))
    }
}
