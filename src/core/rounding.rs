//! Shared decimal rounding rules.
//!
//! Every rounding in the engine is half-up. The scales below are the only
//! ones used: money at 2 places, intermediate ratios and rates at 10,
//! displayed factors at 6, percentages at 4.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

pub const MONEY_SCALE: u32 = 2;
pub const RATIO_SCALE: u32 = 10;
pub const FACTOR_SCALE: u32 = 6;
pub const PERCENT_SCALE: u32 = 4;

pub const HUNDRED: Decimal = dec!(100);

/// Round half-up to `scale` fractional digits.
pub fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

pub fn money(value: Decimal) -> Decimal {
    round_half_up(value, MONEY_SCALE)
}

pub fn ratio(value: Decimal) -> Decimal {
    round_half_up(value, RATIO_SCALE)
}

pub fn factor(value: Decimal) -> Decimal {
    round_half_up(value, FACTOR_SCALE)
}

pub fn percent(value: Decimal) -> Decimal {
    round_half_up(value, PERCENT_SCALE)
}

/// `numerator / denominator` at ratio precision, or `None` for a zero denominator.
pub fn checked_ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }
    numerator.checked_div(denominator).map(ratio)
}

/// A percentage rate (e.g. `1.5`) as a fraction (`0.015`).
pub fn percent_to_fraction(rate_percent: Decimal) -> Decimal {
    ratio(rate_percent / HUNDRED)
}
