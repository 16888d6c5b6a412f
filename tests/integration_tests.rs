use correction_engine::calculation::legislative::LegislativeCalculator;
use correction_engine::calculation::regime::{LegislativeConfig, Regime, Schedule};
use correction_engine::calculation::{run, run_legislative, run_standard};
use correction_engine::core::competence::Competence;
use correction_engine::core::error::{EngineError, ErrorCategory};
use correction_engine::core::request::{
    CalculationMode, CalculationRequest, Installment, InterestKind, Periodicity,
};
use correction_engine::core::result::{CalculationResult, Diagnostic};
use correction_engine::core::series::{IndexSeries, Provenance, SeriesId, SeriesSource, INPC, IPCA_E, SELIC};
use correction_engine::simulation::synthetic::{generate_series, SyntheticSeriesConfig};
use correction_engine::store::memory::InMemoryIndexStore;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(y: i32, m: u32) -> Competence {
    Competence::new(y, m).unwrap()
}

fn put(store: &mut InMemoryIndexStore, series: SeriesId, c: Competence, value: Decimal) {
    store.upsert_point(series, c, value, Provenance::Manual).unwrap();
}

/// INPC, IPCA-E and SELIC registered; IPCA-E with a few points.
fn federal_store() -> (InMemoryIndexStore, SeriesId, SeriesId) {
    let mut store = InMemoryIndexStore::new();
    store.add_series(IndexSeries::new(INPC, SeriesSource::Ibge)).unwrap();
    let ipca = store
        .add_series(IndexSeries::new(IPCA_E, SeriesSource::Ibge).with_official_code("7060"))
        .unwrap();
    let selic = store
        .add_series(IndexSeries::new(SELIC, SeriesSource::Bcb).with_official_code("4390"))
        .unwrap();
    (store, ipca, selic)
}

/// Correction of 10,000.00 by an index going from 100 to 125, plus 1% a
/// month simple interest for twelve months, 10% penalty and 20% fee.
#[test]
fn standard_full_pipeline() {
    let (mut store, ipca, _) = federal_store();
    put(&mut store, ipca, month(2023, 12), dec!(100.00000000));
    put(&mut store, ipca, month(2025, 1), dec!(125.00000000));

    let request = CalculationRequest::new(dec!(10000.00), date(2024, 1, 1), date(2025, 1, 1))
        .with_index(ipca)
        .with_interest(InterestKind::Simple, dec!(1.0), Periodicity::Monthly)
        .with_penalty(dec!(10))
        .with_fee(dec!(20));

    let result = run_standard(&store, &request).unwrap();
    assert_eq!(result.corrected_value, dec!(12500.00));
    // 1% of the corrected value for twelve months.
    assert_eq!(result.interest_value, dec!(1500.00));
    assert_eq!(result.penalty_value, dec!(1400.00));
    assert_eq!(result.fee_value, dec!(3080.00));
    assert_eq!(result.total, dec!(18480.00));
    assert_eq!(result.correction_factor, dec!(1.25));
    assert_eq!(result.installments.len(), 1);
    assert_eq!(result.installments[0].description, "Principal");
    assert_eq!(result.installments[0].interest_months, 12);

    // Only 2025-01 is published inside the period.
    assert_eq!(result.breakdown.len(), 1);
    assert_eq!(result.period_variation_percent, Some(Decimal::ZERO));
    assert!(result.is_complete());
}

#[test]
fn standard_installments_are_summed() {
    let (mut store, ipca, _) = federal_store();
    put(&mut store, ipca, month(2023, 12), dec!(100));
    put(&mut store, ipca, month(2024, 3), dec!(110));
    put(&mut store, ipca, month(2024, 12), dec!(120));

    let request = CalculationRequest::new(dec!(3000), date(2024, 1, 15), date(2024, 12, 31))
        .with_index(ipca)
        .with_interest(InterestKind::Compound, dec!(0.5), Periodicity::Monthly)
        .with_installment(Installment::new("January", dec!(1000), date(2024, 1, 15)))
        .with_installment(Installment::new("April", dec!(2000), date(2024, 4, 15)));

    let result = run_standard(&store, &request).unwrap();
    let jan = &result.installments[0];
    let apr = &result.installments[1];

    // January: base 2023-12 (100) to 2024-12 (120).
    assert_eq!(jan.corrected_value, dec!(1200.00));
    // April: base 2024-03 (110) to 2024-12 (120).
    assert_eq!(apr.corrected_value, dec!(2181.82));
    assert_eq!(result.corrected_value, dec!(3381.82));
    assert_eq!(result.interest_value, jan.interest_value + apr.interest_value);
    assert_eq!(result.subtotal(), jan.subtotal + apr.subtotal);
    assert_eq!(jan.interest_months, 11);
    assert_eq!(apr.interest_months, 8);
}

#[test]
fn standard_without_index_leaves_amounts_unchanged() {
    let (store, _, _) = federal_store();
    let request = CalculationRequest::new(dec!(5000), date(2020, 1, 1), date(2020, 1, 31))
        .with_interest(InterestKind::Simple, dec!(1), Periodicity::Daily);
    let result = run_standard(&store, &request).unwrap();
    assert_eq!(result.corrected_value, dec!(5000));
    assert_eq!(result.correction_factor, Decimal::ONE);
    // 30 days at 1%/30 a day.
    assert_eq!(result.interest_value, dec!(50.00));
    assert!(result.breakdown.is_empty());
    assert_eq!(result.period_variation_percent, None);
}

#[test]
fn standard_errors_are_atomic_and_client_side() {
    let (mut store, ipca, _) = federal_store();
    put(&mut store, ipca, month(2024, 6), dec!(100));

    let request = CalculationRequest::new(dec!(1000), date(2024, 1, 1), date(2024, 12, 31))
        .with_index(ipca);
    let err = run_standard(&store, &request).unwrap_err();
    assert_eq!(
        err,
        EngineError::IndexNotFound {
            series: ipca,
            competence: month(2023, 12),
        }
    );
    assert_eq!(err.category(), ErrorCategory::Client);

    let reversed = CalculationRequest::new(dec!(1000), date(2025, 1, 1), date(2024, 1, 1));
    assert!(matches!(
        run_standard(&store, &reversed),
        Err(EngineError::InvalidRange { .. })
    ));

    let late = CalculationRequest::new(dec!(1000), date(2024, 1, 1), date(2024, 6, 30))
        .with_installment(Installment::new("late", dec!(10), date(2024, 7, 1)));
    assert!(matches!(
        run_standard(&store, &late),
        Err(EngineError::InvalidRange { .. })
    ));
}

/// Doubling every month for ten years is valid input but not a
/// representable amount.
#[test]
fn standard_compound_overflow_is_a_client_error() {
    let (store, _, _) = federal_store();
    let request = CalculationRequest::new(dec!(1000), date(2010, 1, 1), date(2020, 1, 1))
        .with_interest(InterestKind::Compound, dec!(100), Periodicity::Monthly);
    assert!(request.validate().is_ok());

    let err = run_standard(&store, &request).unwrap_err();
    assert_eq!(err, EngineError::AmountOverflow { stage: "interest" });
    assert_eq!(err.category(), ErrorCategory::Client);

    // The same rate over a short span still computes: 1000 * (2^3 - 1).
    let short = CalculationRequest::new(dec!(1000), date(2010, 1, 1), date(2010, 4, 1))
        .with_interest(InterestKind::Compound, dec!(100), Periodicity::Monthly);
    assert_eq!(run_standard(&store, &short).unwrap().interest_value, dec!(7000.00));
}

#[test]
fn zero_base_index_is_reported() {
    let (mut store, ipca, _) = federal_store();
    put(&mut store, ipca, month(2023, 12), Decimal::ZERO);
    put(&mut store, ipca, month(2024, 12), dec!(100));
    let request = CalculationRequest::new(dec!(1000), date(2024, 1, 1), date(2024, 12, 31))
        .with_index(ipca);
    assert_eq!(
        run_standard(&store, &request).unwrap_err(),
        EngineError::ZeroBaseIndex {
            series: ipca,
            competence: month(2023, 12),
        }
    );
}

/// A claim from 2021-11 to 2025-10 crosses three regimes.
#[test]
fn legislative_crosses_regimes() {
    let (mut store, ipca, selic) = federal_store();
    put(&mut store, ipca, month(2021, 11), dec!(100));
    put(&mut store, ipca, month(2025, 9), dec!(130));
    put(&mut store, ipca, month(2025, 10), dec!(131));
    for c in Competence::range_inclusive(month(2021, 12), month(2025, 9)) {
        put(&mut store, selic, c, dec!(200));
    }

    let request = CalculationRequest::new(dec!(1000), date(2021, 11, 1), date(2025, 10, 31))
        .with_mode(CalculationMode::Legislative);
    let result = run(&store, &request).unwrap();

    assert_eq!(result.breakdown.len(), 48);
    assert_eq!(result.corrected_value, dec!(1012.73));
    assert_eq!(result.interest_value, dec!(80.00));
    assert_eq!(result.total, dec!(1092.73));
    assert_eq!(result.correction_factor, dec!(1.012730));
    assert_eq!(result.period_variation_percent, Some(dec!(1.2730)));
    assert!(result.installments.is_empty());

    let labels: Vec<&str> = result.breakdown.iter().map(|e| e.index_name.as_str()).collect();
    assert_eq!(labels[0], "IPCA-E");
    assert!(labels[1..47].iter().all(|l| *l == "SELIC"));
    assert_eq!(labels[47], "IPCA + 2% a.a.");

    // Same result through the explicit entry point.
    assert_eq!(run_legislative(&store, &request).unwrap(), result);
}

#[test]
fn legislative_missing_series_is_server_error() {
    let mut store = InMemoryIndexStore::new();
    store.add_series(IndexSeries::new(INPC, SeriesSource::Ibge)).unwrap();
    let request = CalculationRequest::new(dec!(1000), date(2000, 1, 1), date(2000, 12, 31))
        .with_mode(CalculationMode::Legislative);
    let err = run(&store, &request).unwrap_err();
    assert_eq!(
        err,
        EngineError::UnresolvedSeriesConfiguration {
            name: IPCA_E.to_string()
        }
    );
    assert_eq!(err.category(), ErrorCategory::Server);
}

#[test]
fn legislative_tolerates_missing_months() {
    let (mut store, ipca, _) = federal_store();
    put(&mut store, ipca, month(2015, 1), dec!(100));
    put(&mut store, ipca, month(2015, 6), dec!(105));

    let request = CalculationRequest::new(dec!(1000), date(2015, 1, 1), date(2015, 6, 30))
        .with_mode(CalculationMode::Legislative)
        .with_interest_on_original();
    let result = run(&store, &request).unwrap();

    assert!(!result.is_complete());
    let missing: Vec<Competence> = result
        .warnings
        .iter()
        .filter_map(|w| match w {
            Diagnostic::MissingIndexValue { competence, .. } => Some(*competence),
            _ => None,
        })
        .collect();
    assert_eq!(
        missing,
        vec![month(2015, 2), month(2015, 3), month(2015, 4), month(2015, 5)]
    );
    // June chains from January's value across the gap.
    assert_eq!(result.corrected_value, dec!(1050.00));
    // 0.5% a month for six months on the original amount.
    assert_eq!(result.interest_value, dec!(30.00));
}

#[test]
fn legislative_custom_config() {
    let (mut store, ipca, _) = federal_store();
    put(&mut store, ipca, month(2015, 1), dec!(100));
    put(&mut store, ipca, month(2015, 2), dec!(102));

    let config = LegislativeConfig {
        flat_monthly_rates: Schedule::new(dec!(2), Vec::new()),
        regimes: Schedule::new(Regime::TransitionalIndex, Vec::new()),
        ..LegislativeConfig::default()
    };
    let request = CalculationRequest::new(dec!(1000), date(2015, 1, 1), date(2015, 2, 28));
    let result = LegislativeCalculator::new(config).run(&store, &request).unwrap();
    assert_eq!(result.corrected_value, dec!(1020.00));
    // 2% a month for two months on the corrected value.
    assert_eq!(result.interest_value, dec!(40.80));
}

#[test]
fn result_json_is_idempotent() {
    let mut store = InMemoryIndexStore::new();
    let series = generate_series(
        &SyntheticSeriesConfig::new(IPCA_E, month(2009, 12), month(2019, 12)).with_seed(11),
    );
    let ipca = store.add_series(series).unwrap();

    let request = CalculationRequest::new(dec!(25000), date(2010, 1, 1), date(2019, 12, 31))
        .with_index(ipca)
        .with_interest(InterestKind::Compound, dec!(1), Periodicity::Monthly)
        .with_penalty(dec!(2));

    let first = serde_json::to_string(&run_standard(&store, &request).unwrap()).unwrap();
    let second = serde_json::to_string(&run_standard(&store, &request).unwrap()).unwrap();
    assert_eq!(first, second);

    let back: CalculationResult = serde_json::from_str(&first).unwrap();
    assert_eq!(serde_json::to_string(&back).unwrap(), first);
    assert!(first.contains("\"competence\":\"2010-01\""));
}

#[test]
fn request_deserializes_with_defaults() {
    let json = r#"{
        "principal": "1500.00",
        "start_date": "2022-03-01",
        "end_date": "2023-03-01"
    }"#;
    let request: CalculationRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.mode, CalculationMode::Standard);
    assert_eq!(request.interest_kind, InterestKind::Simple);
    assert_eq!(request.periodicity, Periodicity::Monthly);
    assert!(request.interest_on_corrected);
    assert!(request.installments.is_empty());

    let (store, _, _) = federal_store();
    let result = run(&store, &request).unwrap();
    assert_eq!(result.total, dec!(1500.00));
}

#[test]
fn diagnostics_serialize_with_kind_tag() {
    let diagnostic = Diagnostic::MissingIndexValue {
        competence: month(2015, 2),
        series: IPCA_E.to_string(),
    };
    let json = serde_json::to_string(&diagnostic).unwrap();
    assert_eq!(
        json,
        r#"{"kind":"missing_index_value","competence":"2015-02","series":"IPCA_E"}"#
    );
}
