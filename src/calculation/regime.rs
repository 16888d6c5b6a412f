//! Legislative regimes for public-treasury condemnations.
//!
//! Which index corrects a debt, and which interest rule applies, has
//! changed several times by statute. Each change is a row in an ordered
//! schedule; resolving a month is a single lookup, so a new statute is a
//! data change.

use crate::core::competence::Competence;
use crate::core::series::{INPC, IPCA_E, SELIC};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The correction-and-interest rule in force for a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Early index plus flat simple monthly interest.
    EarlyIndex,
    /// Transitional index plus flat simple monthly interest.
    TransitionalIndex,
    /// One rate index covering both correction and interest.
    UnifiedRate,
    /// Transitional index plus annual simple interest, capped by the
    /// unified rate over the same span.
    CappedIndex,
}

impl Regime {
    /// Whether the regime's index already includes interest.
    pub fn embeds_interest(&self) -> bool {
        matches!(self, Regime::UnifiedRate)
    }
}

/// A value that changes at given months.
///
/// `initial` applies before the first change; after that the latest
/// change at or before the month wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule<T> {
    pub initial: T,
    pub changes: Vec<(Competence, T)>,
}

impl<T> Schedule<T> {
    pub fn new(initial: T, mut changes: Vec<(Competence, T)>) -> Self {
        changes.sort_by_key(|(from, _)| *from);
        Self { initial, changes }
    }

    /// The value in force at `competence`. Does not rely on `changes`
    /// being sorted, so deserialized schedules resolve the same way.
    pub fn at(&self, competence: Competence) -> &T {
        self.changes
            .iter()
            .filter(|(from, _)| *from <= competence)
            .max_by_key(|(from, _)| *from)
            .map(|(_, value)| value)
            .unwrap_or(&self.initial)
    }
}

/// Display names for each regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeLabels {
    pub early: String,
    pub transitional: String,
    pub unified: String,
    pub capped: String,
    /// Used for a capped month where the ceiling replaced the value.
    pub ceiling: String,
}

impl RegimeLabels {
    pub fn for_regime(&self, regime: Regime) -> &str {
        match regime {
            Regime::EarlyIndex => &self.early,
            Regime::TransitionalIndex => &self.transitional,
            Regime::UnifiedRate => &self.unified,
            Regime::CappedIndex => &self.capped,
        }
    }
}

/// Everything the legislative calculation takes from statute.
///
/// The default is federal legislation:
///
/// | From       | Regime                                  |
/// |------------|-----------------------------------------|
/// | (start)    | INPC + 1% a.m.                          |
/// | 1992-01    | IPCA-E + 1% a.m. (0.5% a.m. from 2009-07) |
/// | 2021-12    | SELIC, correction and interest unified  |
/// | 2025-10    | IPCA-E + 2% a.a., capped by SELIC       |
///
/// # Examples
///
/// ```
/// use correction_engine::calculation::regime::{LegislativeConfig, Regime};
/// use correction_engine::core::competence::Competence;
///
/// let config = LegislativeConfig::default();
/// let nov_2021 = Competence::new(2021, 11).unwrap();
/// assert_eq!(config.regime_for(nov_2021), Regime::TransitionalIndex);
/// assert_eq!(config.regime_for(nov_2021.succ()), Regime::UnifiedRate);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegislativeConfig {
    pub early_series: String,
    pub transitional_series: String,
    pub unified_series: String,
    pub regimes: Schedule<Regime>,
    /// Monthly simple interest, in percent, for the two index-plus-interest regimes.
    pub flat_monthly_rates: Schedule<Decimal>,
    /// Annual simple interest, in percent, for the capped regime.
    pub capped_annual_rate: Decimal,
    pub labels: RegimeLabels,
}

impl LegislativeConfig {
    pub fn regime_for(&self, competence: Competence) -> Regime {
        *self.regimes.at(competence)
    }

    pub fn flat_rate_for(&self, competence: Competence) -> Decimal {
        *self.flat_monthly_rates.at(competence)
    }

    /// Name of the index series that drives `regime`.
    pub fn series_name_for(&self, regime: Regime) -> &str {
        match regime {
            Regime::EarlyIndex => &self.early_series,
            Regime::TransitionalIndex | Regime::CappedIndex => &self.transitional_series,
            Regime::UnifiedRate => &self.unified_series,
        }
    }
}

impl Default for LegislativeConfig {
    fn default() -> Self {
        Self {
            early_series: INPC.to_string(),
            transitional_series: IPCA_E.to_string(),
            unified_series: SELIC.to_string(),
            regimes: statute_schedule(
                Regime::EarlyIndex,
                [
                    // Law 8.177/91 transition to IPCA-E.
                    (1992, 1, Regime::TransitionalIndex),
                    // EC 113/2021, in force from 2021-12-09.
                    (2021, 12, Regime::UnifiedRate),
                    // EC 136/2025.
                    (2025, 10, Regime::CappedIndex),
                ],
            ),
            // Law 11.960/2009: savings-account rate.
            flat_monthly_rates: statute_schedule(dec!(1.0), [(2009, 7, dec!(0.5))]),
            capped_annual_rate: dec!(2.0),
            labels: RegimeLabels {
                early: "INPC".to_string(),
                transitional: "IPCA-E".to_string(),
                unified: "SELIC".to_string(),
                capped: "IPCA + 2% a.a.".to_string(),
                ceiling: "SELIC (teto)".to_string(),
            },
        }
    }
}

fn statute_schedule<T, const N: usize>(initial: T, changes: [(i32, u32, T); N]) -> Schedule<T> {
    let changes = changes
        .into_iter()
        .filter_map(|(year, month, value)| Competence::new(year, month).map(|c| (c, value)))
        .collect();
    Schedule::new(initial, changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(y: i32, m: u32) -> Competence {
        Competence::new(y, m).unwrap()
    }

    #[test]
    fn test_regime_boundaries() {
        let config = LegislativeConfig::default();
        assert_eq!(config.regime_for(month(1985, 6)), Regime::EarlyIndex);
        assert_eq!(config.regime_for(month(1991, 12)), Regime::EarlyIndex);
        assert_eq!(config.regime_for(month(1992, 1)), Regime::TransitionalIndex);
        assert_eq!(config.regime_for(month(2021, 11)), Regime::TransitionalIndex);
        assert_eq!(config.regime_for(month(2021, 12)), Regime::UnifiedRate);
        assert_eq!(config.regime_for(month(2025, 9)), Regime::UnifiedRate);
        assert_eq!(config.regime_for(month(2025, 10)), Regime::CappedIndex);
        assert_eq!(config.regime_for(month(2040, 1)), Regime::CappedIndex);
    }

    #[test]
    fn test_flat_rate_changes_in_2009() {
        let config = LegislativeConfig::default();
        assert_eq!(config.flat_rate_for(month(2009, 6)), dec!(1.0));
        assert_eq!(config.flat_rate_for(month(2009, 7)), dec!(0.5));
    }

    #[test]
    fn test_schedule_sorts_changes() {
        let schedule = Schedule::new(0, vec![(month(2020, 1), 2), (month(2010, 1), 1)]);
        assert_eq!(*schedule.at(month(2005, 1)), 0);
        assert_eq!(*schedule.at(month(2015, 1)), 1);
        assert_eq!(*schedule.at(month(2020, 1)), 2);
    }

    #[test]
    fn test_capped_regime_uses_transitional_series() {
        let config = LegislativeConfig::default();
        assert_eq!(config.series_name_for(Regime::CappedIndex), IPCA_E);
        assert_eq!(config.series_name_for(Regime::UnifiedRate), SELIC);
        assert!(Regime::UnifiedRate.embeds_interest());
        assert!(!Regime::CappedIndex.embeds_interest());
    }

    #[test]
    fn test_config_json_round_trip_keeps_schedule() {
        let config = LegislativeConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"2021-12\""));
        let back: LegislativeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
