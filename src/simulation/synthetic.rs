//! Random monthly index series.
//!
//! Values compound a random monthly variation drawn uniformly from a
//! configured range, the way price indices drift. With a seed the output
//! is reproducible.

use crate::core::competence::Competence;
use crate::core::series::{IndexSeries, Provenance, SeriesSource};
use chrono::{Months, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fractional digits kept on generated index values.
const INDEX_SCALE: u32 = 8;

/// Configuration for generating a synthetic index series.
#[derive(Debug, Clone)]
pub struct SyntheticSeriesConfig {
    pub name: String,
    /// First competence with a value.
    pub from: Competence,
    /// Last competence with a value.
    pub to: Competence,
    /// Value at `from`.
    pub base: Decimal,
    /// Smallest monthly variation, in percent. May be negative (deflation).
    pub min_monthly_percent: f64,
    /// Largest monthly variation, in percent.
    pub max_monthly_percent: f64,
    /// Fixed seed for reproducible output; `None` draws from the OS.
    pub seed: Option<u64>,
}

/// Thirty years of monthly values starting at the Unix epoch.
impl Default for SyntheticSeriesConfig {
    fn default() -> Self {
        let epoch = NaiveDate::default();
        Self {
            name: "SYNTHETIC".to_string(),
            from: Competence::from_date(epoch),
            to: Competence::from_date(epoch + Months::new(359)),
            base: dec!(100),
            min_monthly_percent: -0.2,
            max_monthly_percent: 1.2,
            seed: None,
        }
    }
}

impl SyntheticSeriesConfig {
    pub fn new(name: impl Into<String>, from: Competence, to: Competence) -> Self {
        Self {
            name: name.into(),
            from,
            to,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_base(mut self, base: Decimal) -> Self {
        self.base = base;
        self
    }

    /// A series that never moves: every month equals `base`.
    pub fn flat(mut self) -> Self {
        self.min_monthly_percent = 0.0;
        self.max_monthly_percent = 0.0;
        self
    }
}

/// Generate one value per month from `config.from` to `config.to`.
pub fn generate_series(config: &SyntheticSeriesConfig) -> IndexSeries {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut series = IndexSeries::new(config.name.clone(), SeriesSource::Manual);

    let mut value = config.base;
    for competence in Competence::range_inclusive(config.from, config.to) {
        series.insert(competence, value, Provenance::Manual);

        let variation = if config.max_monthly_percent > config.min_monthly_percent {
            rng.gen_range(config.min_monthly_percent..config.max_monthly_percent)
        } else {
            config.min_monthly_percent
        };
        let step = Decimal::from_f64_retain(variation / 100.0)
            .unwrap_or(Decimal::ZERO)
            .round_dp(INDEX_SCALE);
        value = (value * (Decimal::ONE + step)).round_dp(INDEX_SCALE);
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(y: i32, m: u32) -> Competence {
        Competence::new(y, m).unwrap()
    }

    #[test]
    fn test_one_value_per_month() {
        let config = SyntheticSeriesConfig::new("X", month(2000, 1), month(2009, 12)).with_seed(7);
        let series = generate_series(&config);
        assert_eq!(series.len(), 120);
        assert_eq!(series.value_at_or_before(month(2000, 1)), Some(dec!(100)));
    }

    #[test]
    fn test_seed_is_reproducible() {
        let config = SyntheticSeriesConfig::new("X", month(2010, 1), month(2012, 12)).with_seed(42);
        let a: Vec<_> = generate_series(&config).points().map(|p| p.value).collect();
        let b: Vec<_> = generate_series(&config).points().map(|p| p.value).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_values_stay_within_range() {
        let config = SyntheticSeriesConfig {
            min_monthly_percent: 0.0,
            max_monthly_percent: 1.0,
            ..SyntheticSeriesConfig::new("X", month(2010, 1), month(2019, 12)).with_seed(1)
        };
        let values: Vec<_> = generate_series(&config).points().map(|p| p.value).collect();
        for pair in values.windows(2) {
            assert!(pair[1] >= pair[0]);
            assert!(pair[1] <= (pair[0] * dec!(1.01)).round_dp(INDEX_SCALE));
        }
    }

    #[test]
    fn test_flat_series() {
        let config = SyntheticSeriesConfig::new("X", month(2020, 1), month(2020, 6))
            .with_base(dec!(250))
            .flat();
        assert!(generate_series(&config).points().all(|p| p.value == dec!(250)));
    }

    #[test]
    fn test_default_spans_thirty_years() {
        let config = SyntheticSeriesConfig::default();
        assert_eq!(config.from, month(1970, 1));
        assert_eq!(config.to, month(1999, 12));
    }

    #[test]
    fn test_empty_when_reversed() {
        let config = SyntheticSeriesConfig::new("X", month(2020, 6), month(2020, 1));
        assert!(generate_series(&config).is_empty());
    }
}
