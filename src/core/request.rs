use crate::core::error::EngineError;
use crate::core::rounding::HUNDRED;
use crate::core::series::SeriesId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Simple or compound interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestKind {
    #[default]
    Simple,
    Compound,
}

/// The unit in which interest periods are counted.
///
/// Rates are always given per month; the periodicity only decides how
/// elapsed time is counted and how the monthly rate is rescaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Periodicity {
    Daily,
    #[default]
    Monthly,
    Annual,
}

/// Which orchestrator runs the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMode {
    /// One user-selected index and one interest rate for the whole period.
    #[default]
    Standard,
    /// Index and interest regime chosen month by month from legislative history.
    Legislative,
}

/// One sub-amount of a claim with its own due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    #[serde(default)]
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    /// Overrides the request's index series for this installment.
    #[serde(default)]
    pub index_series: Option<SeriesId>,
}

impl Installment {
    pub fn new(description: impl Into<String>, amount: Decimal, due_date: NaiveDate) -> Self {
        Self {
            description: description.into(),
            amount,
            due_date,
            index_series: None,
        }
    }

    pub fn with_index(mut self, series: SeriesId) -> Self {
        self.index_series = Some(series);
        self
    }
}

/// Everything a calculation needs besides index data.
///
/// # Examples
///
/// ```
/// use correction_engine::core::request::{CalculationRequest, InterestKind, Periodicity};
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let request = CalculationRequest::new(
///     dec!(10000.00),
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
/// )
/// .with_interest(InterestKind::Simple, dec!(1.0), Periodicity::Monthly)
/// .with_penalty(dec!(10));
///
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Used as the single implicit installment when none are given.
    pub principal: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub index_series: Option<SeriesId>,
    #[serde(default)]
    pub interest_kind: InterestKind,
    /// Monthly rate, in percent.
    #[serde(default)]
    pub interest_rate: Decimal,
    #[serde(default)]
    pub periodicity: Periodicity,
    #[serde(default)]
    pub penalty_percent: Decimal,
    #[serde(default)]
    pub fee_percent: Decimal,
    /// Accrue interest on the corrected value instead of the original amount.
    #[serde(default = "default_true")]
    pub interest_on_corrected: bool,
    #[serde(default)]
    pub installments: Vec<Installment>,
    #[serde(default)]
    pub mode: CalculationMode,
}

fn default_true() -> bool {
    true
}

impl CalculationRequest {
    pub fn new(principal: Decimal, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            principal,
            start_date,
            end_date,
            index_series: None,
            interest_kind: InterestKind::Simple,
            interest_rate: Decimal::ZERO,
            periodicity: Periodicity::Monthly,
            penalty_percent: Decimal::ZERO,
            fee_percent: Decimal::ZERO,
            interest_on_corrected: true,
            installments: Vec::new(),
            mode: CalculationMode::Standard,
        }
    }

    pub fn with_index(mut self, series: SeriesId) -> Self {
        self.index_series = Some(series);
        self
    }

    pub fn with_interest(
        mut self,
        kind: InterestKind,
        rate_percent: Decimal,
        periodicity: Periodicity,
    ) -> Self {
        self.interest_kind = kind;
        self.interest_rate = rate_percent;
        self.periodicity = periodicity;
        self
    }

    pub fn with_penalty(mut self, percent: Decimal) -> Self {
        self.penalty_percent = percent;
        self
    }

    pub fn with_fee(mut self, percent: Decimal) -> Self {
        self.fee_percent = percent;
        self
    }

    /// Accrue interest on the original amounts rather than the corrected ones.
    pub fn with_interest_on_original(mut self) -> Self {
        self.interest_on_corrected = false;
        self
    }

    pub fn with_installment(mut self, installment: Installment) -> Self {
        self.installments.push(installment);
        self
    }

    pub fn with_mode(mut self, mode: CalculationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Installments to compute: the given ones, or the principal due on
    /// the start date when none were given.
    pub fn effective_installments(&self) -> Vec<Installment> {
        if self.installments.is_empty() {
            vec![Installment::new("Principal", self.principal, self.start_date)]
        } else {
            self.installments.clone()
        }
    }

    /// Check dates, amounts and percentages before any index is consulted.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.start_date > self.end_date {
            return Err(EngineError::InvalidRange {
                from: self.start_date,
                to: self.end_date,
            });
        }
        if self.principal < Decimal::ZERO {
            return Err(EngineError::InvalidParameter {
                field: "principal",
                value: self.principal,
            });
        }
        check_percent("interest_rate", self.interest_rate)?;
        check_percent("penalty_percent", self.penalty_percent)?;
        check_percent("fee_percent", self.fee_percent)?;

        for installment in &self.installments {
            if installment.amount <= Decimal::ZERO {
                return Err(EngineError::InvalidParameter {
                    field: "installment amount",
                    value: installment.amount,
                });
            }
            if installment.due_date > self.end_date {
                return Err(EngineError::InvalidRange {
                    from: installment.due_date,
                    to: self.end_date,
                });
            }
        }
        Ok(())
    }
}

fn check_percent(field: &'static str, value: Decimal) -> Result<(), EngineError> {
    if value < Decimal::ZERO || value > HUNDRED {
        return Err(EngineError::InvalidParameter { field, value });
    }
    Ok(())
}
