use crate::core::competence::Competence;
use crate::core::series::SeriesId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that abort a calculation.
///
/// All of them are deterministic: retrying the same request against the
/// same index data fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("no index value for series {series} at or before {competence}")]
    IndexNotFound {
        series: SeriesId,
        competence: Competence,
    },

    #[error("base index value of series {series} at {competence} is zero")]
    ZeroBaseIndex {
        series: SeriesId,
        competence: Competence,
    },

    #[error("index series '{name}' is required but not configured in the index store")]
    UnresolvedSeriesConfiguration { name: String },

    #[error("invalid {field}: {value}")]
    InvalidParameter { field: &'static str, value: Decimal },

    #[error("{stage} amount exceeds the representable decimal range")]
    AmountOverflow { stage: &'static str },
}

/// Who is at fault for an [`EngineError`], for mapping onto client/server
/// status classes by the API layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request or its data is at fault (4xx).
    Client,
    /// The deployment is misconfigured (5xx).
    Server,
}

impl EngineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EngineError::UnresolvedSeriesConfiguration { .. } => ErrorCategory::Server,
            _ => ErrorCategory::Client,
        }
    }
}

/// Errors from mutating an index store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("an index series named '{0}' already exists")]
    DuplicateSeriesName(String),

    #[error("unknown index series {0}")]
    UnknownSeries(SeriesId),
}
