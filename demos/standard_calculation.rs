//! Standard correction of a labour claim.
//!
//! Corrects a principal and two installments by IPCA-E, accrues 1% a
//! month simple interest and adds a 10% penalty and 20% fees.

use correction_engine::prelude::*;
use correction_engine::simulation::synthetic::{generate_series, SyntheticSeriesConfig};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn main() {
    println!("╔═════════════════════════════════════════════╗");
    println!("║  correction-engine: Standard Calculation    ║");
    println!("╚═════════════════════════════════════════════╝\n");

    let mut store = InMemoryIndexStore::new();
    let from = Competence::new(2019, 12).unwrap();
    let to = Competence::new(2024, 12).unwrap();
    let ipca = store
        .add_series(generate_series(
            &SyntheticSeriesConfig::new("IPCA_E", from, to).with_seed(2024),
        ))
        .unwrap();

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

    // --- Scenario 1: Single principal ---
    println!("━━━ Scenario 1: Principal only ━━━\n");

    let request = CalculationRequest::new(dec!(10_000.00), date(2020, 1, 1), date(2024, 12, 31))
        .with_index(ipca)
        .with_interest(InterestKind::Simple, dec!(1.0), Periodicity::Monthly)
        .with_penalty(dec!(10))
        .with_fee(dec!(20));

    match run(&store, &request) {
        Ok(result) => println!("{}", result),
        Err(e) => eprintln!("Calculation failed: {}", e),
    }

    // --- Scenario 2: Installments, interest on the original amounts ---
    println!("━━━ Scenario 2: Installments ━━━\n");

    let request = CalculationRequest::new(dec!(7_500.00), date(2021, 3, 10), date(2024, 12, 31))
        .with_index(ipca)
        .with_interest(InterestKind::Compound, dec!(0.5), Periodicity::Monthly)
        .with_interest_on_original()
        .with_installment(Installment::new("Unpaid overtime", dec!(4_500.00), date(2021, 3, 10)))
        .with_installment(Installment::new("Vacation pay", dec!(3_000.00), date(2022, 8, 5)));

    match run(&store, &request) {
        Ok(result) => {
            for inst in &result.installments {
                println!(
                    "  {:<16} {:>10} → {:>10} + {:>9} interest",
                    inst.description, inst.original_amount, inst.corrected_value, inst.interest_value
                );
            }
            println!("\n  Total: {}", result.total);
        }
        Err(e) => eprintln!("Calculation failed: {}", e),
    }
}
