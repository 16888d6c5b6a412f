use crate::calculation::regime::{LegislativeConfig, Regime};
use crate::core::competence::Competence;
use crate::core::error::EngineError;
use crate::core::request::{CalculationRequest, InterestKind, Periodicity};
use crate::core::result::{CalculationResult, Diagnostic, MonthlyBreakdownEntry};
use crate::core::rounding::{self, HUNDRED};
use crate::core::series::SeriesId;
use crate::engine::aggregate::ResultAggregator;
use crate::engine::correction::CorrectionEngine;
use crate::engine::interest::InterestEngine;
use crate::store::cache::CachedIndexStore;
use crate::store::IndexStore;
use rust_decimal::Decimal;

/// Series IDs for each regime, resolved once before the monthly loop.
#[derive(Debug, Clone, Copy)]
struct ResolvedSeries {
    early: SeriesId,
    transitional: SeriesId,
    unified: SeriesId,
}

impl ResolvedSeries {
    fn resolve<S: IndexStore + ?Sized>(
        store: &S,
        config: &LegislativeConfig,
    ) -> Result<Self, EngineError> {
        let lookup = |name: &str| {
            store
                .resolve_name(name)
                .ok_or_else(|| EngineError::UnresolvedSeriesConfiguration {
                    name: name.to_string(),
                })
        };
        Ok(Self {
            early: lookup(&config.early_series)?,
            transitional: lookup(&config.transitional_series)?,
            unified: lookup(&config.unified_series)?,
        })
    }

    fn for_regime(&self, regime: Regime) -> SeriesId {
        match regime {
            Regime::EarlyIndex => self.early,
            Regime::TransitionalIndex | Regime::CappedIndex => self.transitional,
            Regime::UnifiedRate => self.unified,
        }
    }
}

/// What one month hands to the next.
#[derive(Debug, Clone, Copy)]
struct Carry {
    corrected: Decimal,
    interest: Decimal,
    regime: Option<Regime>,
    /// Last index value seen since the current regime began.
    last_index: Option<Decimal>,
}

/// Month-by-month calculation for public-treasury condemnations.
///
/// Each month picks its regime from [`LegislativeConfig`], chains the
/// previous month's corrected value through that regime's index, and
/// accrues the regime's interest. Moving into the unified-rate regime
/// folds the accumulated interest into the value being corrected, so the
/// first unified month starts from the previous month's subtotal. In the
/// capped regime the result is limited to what the unified index alone
/// would have produced over the whole span.
///
/// Months without a published index value carry the previous value
/// forward and are reported in [`CalculationResult::warnings`]; only a
/// series missing from the store entirely is an error.
#[derive(Debug, Clone, Default)]
pub struct LegislativeCalculator {
    config: LegislativeConfig,
}

impl LegislativeCalculator {
    pub fn new(config: LegislativeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LegislativeConfig {
        &self.config
    }

    pub fn run<S: IndexStore + ?Sized>(
        &self,
        store: &S,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, EngineError> {
        request.validate()?;
        let store = CachedIndexStore::new(store);
        let series = ResolvedSeries::resolve(&store, &self.config)?;
        log::debug!(
            "legislative series resolved: {}={}, {}={}, {}={}",
            self.config.early_series,
            series.early,
            self.config.transitional_series,
            series.transitional,
            self.config.unified_series,
            series.unified
        );

        let mut warnings = Vec::new();
        if !request.installments.is_empty() {
            log::warn!(
                "{} installment(s) ignored in legislative mode; computing on the principal",
                request.installments.len()
            );
            warnings.push(Diagnostic::InstallmentsIgnored {
                count: request.installments.len(),
            });
        }

        let start = Competence::from_date(request.start_date);
        let end = Competence::from_date(request.end_date);

        let mut carry = Carry {
            corrected: request.principal,
            interest: Decimal::ZERO,
            regime: None,
            last_index: None,
        };
        let mut breakdown = Vec::new();

        for competence in Competence::range_inclusive(start, end) {
            let (entry, next) =
                self.step(&store, request, &series, start, competence, carry, &mut warnings)?;
            breakdown.push(entry);
            carry = next;
        }

        let (corrected, interest) = breakdown
            .last()
            .map(|entry| (entry.corrected_value, entry.interest_value))
            .unwrap_or((request.principal, Decimal::ZERO));

        let totals = ResultAggregator::totals(
            corrected,
            interest,
            request.penalty_percent,
            request.fee_percent,
        )?;
        let correction_factor = ResultAggregator::overall_factor(corrected, request.principal);

        Ok(CalculationResult {
            original_value: request.principal,
            corrected_value: corrected,
            interest_value: interest,
            penalty_value: totals.penalty,
            fee_value: totals.fee,
            total: totals.total,
            correction_factor,
            period_variation_percent: ResultAggregator::factor_variation(correction_factor),
            installments: Vec::new(),
            breakdown,
            warnings,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn step<S: IndexStore + ?Sized>(
        &self,
        store: &S,
        request: &CalculationRequest,
        series: &ResolvedSeries,
        start: Competence,
        competence: Competence,
        carry: Carry,
        warnings: &mut Vec<Diagnostic>,
    ) -> Result<(MonthlyBreakdownEntry, Carry), EngineError> {
        let overflow = |stage: &'static str| EngineError::AmountOverflow { stage };
        let regime = self.config.regime_for(competence);
        let regime_changed = carry.regime != Some(regime);
        let entering_unified = regime.embeds_interest()
            && carry.regime.map_or(false, |previous| !previous.embeds_interest());

        if regime_changed {
            log::debug!(
                "{}: regime {:?} (index {})",
                competence,
                regime,
                self.config.series_name_for(regime)
            );
        }

        // The unified index already embeds interest, so it corrects the whole subtotal.
        let base = if entering_unified {
            carry
                .corrected
                .checked_add(carry.interest)
                .ok_or_else(|| overflow("corrected"))?
        } else {
            carry.corrected
        };

        let series_id = series.for_regime(regime);
        let last_index = if regime_changed { None } else { carry.last_index };
        let current = store.lookup_exact(series_id, competence);

        let (mut corrected, variation) = match current {
            None => {
                let name = self.config.series_name_for(regime).to_string();
                log::warn!("{}: no {} value; carrying {} forward", competence, name, base);
                warnings.push(Diagnostic::MissingIndexValue {
                    competence,
                    series: name,
                });
                (base, None)
            }
            Some(value) => {
                let previous = if carry.regime.is_none() || entering_unified {
                    None
                } else {
                    store
                        .lookup_exact(series_id, competence.pred())
                        .or(last_index)
                };
                match previous.and_then(|prev| rounding::checked_ratio(value, prev)) {
                    Some(ratio) => (
                        base.checked_mul(ratio)
                            .map(rounding::money)
                            .ok_or_else(|| overflow("corrected"))?,
                        Some(rounding::percent((ratio - Decimal::ONE) * HUNDRED)),
                    ),
                    None => (base, None),
                }
            }
        };

        let months = start.months_until(competence) + 1;
        let interest_base = if request.interest_on_corrected {
            corrected
        } else {
            request.principal
        };
        let mut interest = match regime {
            Regime::EarlyIndex | Regime::TransitionalIndex => InterestEngine::accrue(
                interest_base,
                self.config.flat_rate_for(competence),
                InterestKind::Simple,
                months,
                Periodicity::Monthly,
            )?,
            Regime::UnifiedRate => Decimal::ZERO,
            Regime::CappedIndex => request
                .principal
                .checked_mul(rounding::percent_to_fraction(self.config.capped_annual_rate))
                .and_then(|v| v.checked_mul(Decimal::from(months)))
                .map(|v| rounding::money(v / Decimal::from(12)))
                .ok_or_else(|| overflow("interest"))?,
        };
        let additive = corrected
            .checked_add(interest)
            .ok_or_else(|| overflow("subtotal"))?;

        let mut label = self.config.labels.for_regime(regime).to_string();

        if regime == Regime::CappedIndex {
            match CorrectionEngine::corrected_amount(
                store,
                request.principal,
                request.start_date,
                competence.last_day(),
                series.unified,
            ) {
                Ok(alternative) if alternative < additive => {
                    corrected = alternative;
                    interest = Decimal::ZERO;
                    label = self.config.labels.ceiling.clone();
                }
                Ok(_) => {}
                Err(err) => {
                    log::warn!("{}: ceiling not applied: {}", competence, err);
                    warnings.push(Diagnostic::CeilingUnavailable {
                        competence,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let entry = MonthlyBreakdownEntry {
            competence,
            index_name: label,
            index_value: current,
            variation_percent: variation,
            cumulative_factor: ResultAggregator::overall_factor(corrected, request.principal),
            corrected_value: corrected,
            interest_value: interest,
            subtotal: corrected + interest,
        };
        let next = Carry {
            corrected,
            interest,
            regime: Some(regime),
            last_index: current.or(last_index),
        };
        Ok((entry, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::{CalculationMode, Installment};
    use crate::core::series::{IndexSeries, Provenance, SeriesSource, INPC, IPCA_E, SELIC};
    use crate::store::memory::InMemoryIndexStore;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> Competence {
        Competence::new(y, m).unwrap()
    }

    struct Fixture {
        store: InMemoryIndexStore,
        ipca: SeriesId,
        selic: SeriesId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut store = InMemoryIndexStore::new();
            store.add_series(IndexSeries::new(INPC, SeriesSource::Ibge)).unwrap();
            let ipca = store.add_series(IndexSeries::new(IPCA_E, SeriesSource::Ibge)).unwrap();
            let selic = store.add_series(IndexSeries::new(SELIC, SeriesSource::Bcb)).unwrap();
            Self { store, ipca, selic }
        }

        fn set(&mut self, series: SeriesId, from: Competence, to: Competence, value: Decimal) {
            for c in Competence::range_inclusive(from, to) {
                self.store.upsert_point(series, c, value, Provenance::Manual).unwrap();
            }
        }

        fn request(&self) -> CalculationRequest {
            CalculationRequest::new(dec!(1000), date(2021, 11, 1), date(2025, 10, 31))
                .with_mode(CalculationMode::Legislative)
        }
    }

    /// IPCA-E at 100 in 2021-11, 130 in 2025-09 and 131 in 2025-10; SELIC
    /// flat at 200 from 2021-12 to 2025-09.
    fn crossing_fixture() -> Fixture {
        let mut f = Fixture::new();
        let (ipca, selic) = (f.ipca, f.selic);
        f.set(ipca, month(2021, 11), month(2021, 11), dec!(100));
        f.set(ipca, month(2025, 9), month(2025, 9), dec!(130));
        f.set(ipca, month(2025, 10), month(2025, 10), dec!(131));
        f.set(selic, month(2021, 12), month(2025, 9), dec!(200));
        f
    }

    #[test]
    fn test_crossing_three_regimes() {
        let f = crossing_fixture();
        let result = LegislativeCalculator::default().run(&f.store, &f.request()).unwrap();

        assert_eq!(result.breakdown.len(), 48);

        let first = &result.breakdown[0];
        assert_eq!(first.index_name, "IPCA-E");
        assert_eq!(first.corrected_value, dec!(1000));
        assert_eq!(first.interest_value, dec!(5.00));
        assert_eq!(first.variation_percent, None);

        let unified = &result.breakdown[1];
        assert_eq!(unified.index_name, "SELIC");
        assert_eq!(unified.corrected_value, dec!(1005.00));
        assert_eq!(unified.interest_value, Decimal::ZERO);

        let last = result.breakdown.last().unwrap();
        assert_eq!(last.index_name, "IPCA + 2% a.a.");
        assert_eq!(last.corrected_value, dec!(1012.73));
        assert_eq!(last.variation_percent, Some(dec!(0.7692)));
        assert_eq!(last.interest_value, dec!(80.00));

        assert_eq!(result.total, dec!(1092.73));
        assert_eq!(result.correction_factor, dec!(1.012730));
        assert_eq!(result.period_variation_percent, Some(dec!(1.2730)));
        // No SELIC value before the start, so the ceiling could not be checked.
        assert!(matches!(
            result.warnings.as_slice(),
            [Diagnostic::CeilingUnavailable { .. }]
        ));
    }

    #[test]
    fn test_continuity_into_unified_regime() {
        let f = crossing_fixture();
        let result = LegislativeCalculator::default().run(&f.store, &f.request()).unwrap();
        let before = &result.breakdown[0];
        let after = &result.breakdown[1];
        assert_eq!(before.competence, month(2021, 11));
        assert_eq!(after.competence, month(2021, 12));
        assert_eq!(after.corrected_value, before.subtotal);
    }

    #[test]
    fn test_ceiling_replaces_value_and_zeroes_interest() {
        let mut f = crossing_fixture();
        let selic = f.selic;
        // SELIC 200 before the start and 180 in 2025-10: alternative is 900.
        f.set(selic, month(2021, 10), month(2021, 10), dec!(200));
        f.set(selic, month(2025, 10), month(2025, 10), dec!(180));
        let result = LegislativeCalculator::default().run(&f.store, &f.request()).unwrap();

        let last = result.breakdown.last().unwrap();
        assert_eq!(last.index_name, "SELIC (teto)");
        assert_eq!(last.corrected_value, dec!(900.00));
        assert_eq!(last.interest_value, Decimal::ZERO);
        assert_eq!(result.total, dec!(900.00));
        assert_eq!(result.period_variation_percent, None);
        assert!(result.is_complete());

        let with_installment = f
            .request()
            .with_installment(Installment::new("a", dec!(10), date(2022, 1, 1)));
        let result = LegislativeCalculator::default().run(&f.store, &with_installment).unwrap();
        assert_eq!(result.warnings, vec![Diagnostic::InstallmentsIgnored { count: 1 }]);
        assert!(result.is_complete());
    }

    #[test]
    fn test_gap_carries_value_forward() {
        let mut f = Fixture::new();
        let ipca = f.ipca;
        f.set(ipca, month(2020, 1), month(2020, 1), dec!(100));
        f.set(ipca, month(2020, 2), month(2020, 2), dec!(110));
        f.set(ipca, month(2020, 4), month(2020, 4), dec!(121));
        let request = CalculationRequest::new(dec!(1000), date(2020, 1, 1), date(2020, 4, 30))
            .with_interest_on_original();
        let result = LegislativeCalculator::default().run(&f.store, &request).unwrap();

        let march = &result.breakdown[2];
        assert_eq!(march.index_value, None);
        assert_eq!(march.variation_percent, None);
        assert_eq!(march.corrected_value, dec!(1100.00));

        // April chains from the last known value (110), not from zero.
        let april = &result.breakdown[3];
        assert_eq!(april.corrected_value, dec!(1210.00));
        assert_eq!(april.variation_percent, Some(dec!(10.0000)));
        // 0.5% a month on the original 1000 over four months.
        assert_eq!(april.interest_value, dec!(20.00));

        assert_eq!(
            result.warnings,
            vec![Diagnostic::MissingIndexValue {
                competence: month(2020, 3),
                series: IPCA_E.to_string(),
            }]
        );
    }

    #[test]
    fn test_early_regime_uses_early_series_and_full_rate() {
        let mut f = Fixture::new();
        let inpc = f.store.resolve_name(INPC).unwrap();
        f.set(inpc, month(1990, 1), month(1990, 1), dec!(100));
        f.set(inpc, month(1990, 2), month(1990, 2), dec!(150));
        let request = CalculationRequest::new(dec!(1000), date(1990, 1, 1), date(1990, 2, 28));
        let result = LegislativeCalculator::default().run(&f.store, &request).unwrap();

        let feb = &result.breakdown[1];
        assert_eq!(feb.index_name, "INPC");
        assert_eq!(feb.corrected_value, dec!(1500.00));
        // 1% a month over two months on the corrected value.
        assert_eq!(feb.interest_value, dec!(30.00));
        assert_eq!(result.total, dec!(1530.00));
    }

    #[test]
    fn test_unresolved_series_fails_before_loop() {
        let mut store = InMemoryIndexStore::new();
        store.add_series(IndexSeries::new(INPC, SeriesSource::Ibge)).unwrap();
        store.add_series(IndexSeries::new(IPCA_E, SeriesSource::Ibge)).unwrap();
        let request = CalculationRequest::new(dec!(1000), date(2022, 1, 1), date(2022, 6, 30));
        let err = LegislativeCalculator::default().run(&store, &request).unwrap_err();
        assert_eq!(
            err,
            EngineError::UnresolvedSeriesConfiguration {
                name: SELIC.to_string()
            }
        );
        assert_eq!(err.category(), crate::core::error::ErrorCategory::Server);
    }

    #[test]
    fn test_installments_are_ignored_with_diagnostic() {
        let f = crossing_fixture();
        let request = f
            .request()
            .with_installment(Installment::new("a", dec!(10), date(2022, 1, 1)));
        let result = LegislativeCalculator::default().run(&f.store, &request).unwrap();
        assert!(result.installments.is_empty());
        assert!(result
            .warnings
            .contains(&Diagnostic::InstallmentsIgnored { count: 1 }));
        assert_eq!(result.corrected_value, dec!(1012.73));
    }
}
