use crate::core::competence::Competence;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One month of the auditable breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBreakdownEntry {
    pub competence: Competence,
    /// Name of the index or legislative regime applied this month.
    pub index_name: String,
    pub index_value: Option<Decimal>,
    /// Month-over-month index variation in percent; none for the first
    /// month of a series or when the month has no index value.
    pub variation_percent: Option<Decimal>,
    pub cumulative_factor: Decimal,
    pub corrected_value: Decimal,
    pub interest_value: Decimal,
    pub subtotal: Decimal,
}

/// Outcome for one installment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentResult {
    pub description: String,
    pub original_amount: Decimal,
    pub due_date: NaiveDate,
    pub corrected_value: Decimal,
    pub interest_value: Decimal,
    pub subtotal: Decimal,
    /// Whole months of interest accrual, for display.
    pub interest_months: i64,
    pub index_name: Option<String>,
}

/// A condition the engine tolerated instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No index value was published for the month; the previous value was carried.
    MissingIndexValue {
        competence: Competence,
        series: String,
    },
    /// The ceiling comparison could not be made for the month.
    CeilingUnavailable {
        competence: Competence,
        reason: String,
    },
    /// Installments were supplied to a calculation that runs on the principal only.
    InstallmentsIgnored { count: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingIndexValue { competence, series } => {
                write!(f, "{}: no {} value, previous value carried", competence, series)
            }
            Diagnostic::CeilingUnavailable { competence, reason } => {
                write!(f, "{}: ceiling not applied ({})", competence, reason)
            }
            Diagnostic::InstallmentsIgnored { count } => {
                write!(f, "{} installment(s) ignored; computed on the principal", count)
            }
        }
    }
}

/// The full outcome of a calculation.
///
/// Contains no timestamps or generated identifiers: the same request
/// against the same index data serializes identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub original_value: Decimal,
    pub corrected_value: Decimal,
    pub interest_value: Decimal,
    pub penalty_value: Decimal,
    pub fee_value: Decimal,
    pub total: Decimal,
    pub correction_factor: Decimal,
    pub period_variation_percent: Option<Decimal>,
    pub installments: Vec<InstallmentResult>,
    pub breakdown: Vec<MonthlyBreakdownEntry>,
    #[serde(default)]
    pub warnings: Vec<Diagnostic>,
}

impl CalculationResult {
    /// Corrected value plus interest, before penalty and fee.
    pub fn subtotal(&self) -> Decimal {
        self.corrected_value + self.interest_value
    }

    /// Whether every month had the index data it needed.
    ///
    /// Ignored installments do not count: they change the input, not the
    /// data the result was computed from.
    pub fn is_complete(&self) -> bool {
        !self.warnings.iter().any(|warning| {
            matches!(
                warning,
                Diagnostic::MissingIndexValue { .. } | Diagnostic::CeilingUnavailable { .. }
            )
        })
    }
}

impl fmt::Display for CalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Calculation Result ===")?;
        writeln!(f, "Original Value:   {}", self.original_value)?;
        writeln!(f, "Corrected Value:  {}", self.corrected_value)?;
        writeln!(f, "Interest:         {}", self.interest_value)?;
        writeln!(f, "Penalty:          {}", self.penalty_value)?;
        writeln!(f, "Fees:             {}", self.fee_value)?;
        writeln!(f, "Total:            {}", self.total)?;
        writeln!(f, "Factor:           {}", self.correction_factor)?;
        match self.period_variation_percent {
            Some(v) => writeln!(f, "Variation:        {}%", v)?,
            None => writeln!(f, "Variation:        -")?,
        }

        if !self.installments.is_empty() {
            writeln!(f, "\n--- Installments ---")?;
            for inst in &self.installments {
                writeln!(
                    f,
                    "  {:<20} {} due {}  corrected {}  interest {} ({} months)  [{}]",
                    inst.description,
                    inst.original_amount,
                    inst.due_date,
                    inst.corrected_value,
                    inst.interest_value,
                    inst.interest_months,
                    inst.index_name.as_deref().unwrap_or("no correction"),
                )?;
            }
        }

        if !self.breakdown.is_empty() {
            writeln!(f, "\n--- Monthly Breakdown ---")?;
            for entry in &self.breakdown {
                let variation = entry
                    .variation_percent
                    .map(|v| format!("{}%", v))
                    .unwrap_or_else(|| "-".to_string());
                writeln!(
                    f,
                    "  {}  {:<16} var {:>10}  factor {:>10}  corrected {:>14}  interest {:>12}  subtotal {:>14}",
                    entry.competence,
                    entry.index_name,
                    variation,
                    entry.cumulative_factor,
                    entry.corrected_value,
                    entry.interest_value,
                    entry.subtotal,
                )?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f, "\n--- Warnings ---")?;
            for warning in &self.warnings {
                writeln!(f, "  {}", warning)?;
            }
        }
        Ok(())
    }
}
