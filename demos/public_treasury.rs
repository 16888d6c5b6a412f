//! Condemnation of the public treasury across legislative regimes.
//!
//! A claim from 2019 to 2026 starts under IPCA-E plus savings-rate
//! interest, switches to SELIC in December 2021 and ends in the capped
//! regime, where SELIC acts as a ceiling.

use correction_engine::prelude::*;
use correction_engine::simulation::synthetic::{generate_series, SyntheticSeriesConfig};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn main() {
    println!("╔═════════════════════════════════════════════╗");
    println!("║  correction-engine: Public Treasury         ║");
    println!("╚═════════════════════════════════════════════╝\n");

    let mut store = InMemoryIndexStore::new();
    let from = Competence::new(1990, 1).unwrap();
    let to = Competence::new(2026, 12).unwrap();
    for (seed, name) in ["INPC", "IPCA_E", "SELIC"].into_iter().enumerate() {
        let config = SyntheticSeriesConfig::new(name, from, to).with_seed(seed as u64);
        store.add_series(generate_series(&config)).unwrap();
    }

    let request = CalculationRequest::new(
        dec!(50_000.00),
        NaiveDate::from_ymd_opt(2019, 6, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
    )
    .with_mode(CalculationMode::Legislative)
    .with_fee(dec!(10));

    let config = LegislativeConfig::default();
    let result = match LegislativeCalculator::new(config.clone()).run(&store, &request) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Calculation failed ({:?}): {}", e.category(), e);
            return;
        }
    };

    println!("━━━ Regime transitions ━━━\n");
    let mut previous: Option<Regime> = None;
    for entry in &result.breakdown {
        let regime = config.regime_for(entry.competence);
        if previous != Some(regime) {
            println!(
                "  {}  {:<16} corrected {:>12}  interest {:>10}",
                entry.competence, entry.index_name, entry.corrected_value, entry.interest_value
            );
            previous = Some(regime);
        }
    }

    let ceiling_months = result
        .breakdown
        .iter()
        .filter(|e| e.index_name == config.labels.ceiling)
        .count();
    println!("\n  Months limited by the ceiling: {}\n", ceiling_months);

    println!("{}", result);
}
