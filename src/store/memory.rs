use crate::core::competence::Competence;
use crate::core::error::StoreError;
use crate::core::series::{IndexPoint, IndexSeries, Provenance, SeriesId};
use crate::store::IndexStore;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// An index store held entirely in memory.
///
/// Series names are unique. Used by the CLI, the tests and anyone who
/// loads index data up front.
///
/// # Examples
///
/// ```
/// use correction_engine::core::competence::Competence;
/// use correction_engine::core::series::{IndexSeries, Provenance, SeriesSource};
/// use correction_engine::store::memory::InMemoryIndexStore;
/// use correction_engine::store::IndexStore;
/// use rust_decimal_macros::dec;
///
/// let mut store = InMemoryIndexStore::new();
/// let id = store.add_series(IndexSeries::new("INPC", SeriesSource::Ibge)).unwrap();
/// let jan = Competence::new(2020, 1).unwrap();
/// store.upsert_point(id, jan, dec!(5000.12), Provenance::ApiIbge).unwrap();
///
/// assert_eq!(store.resolve_name("INPC"), Some(id));
/// assert_eq!(store.lookup_exact(id, jan), Some(dec!(5000.12)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryIndexStore {
    series: HashMap<SeriesId, IndexSeries>,
    names: HashMap<String, SeriesId>,
}

impl InMemoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a series, with any points it already holds.
    pub fn add_series(&mut self, series: IndexSeries) -> Result<SeriesId, StoreError> {
        if self.names.contains_key(series.name()) {
            return Err(StoreError::DuplicateSeriesName(series.name().to_string()));
        }
        let id = series.id();
        self.names.insert(series.name().to_string(), id);
        self.series.insert(id, series);
        Ok(id)
    }

    /// Insert or replace one value. Returns the replaced value.
    pub fn upsert_point(
        &mut self,
        series: SeriesId,
        competence: Competence,
        value: Decimal,
        provenance: Provenance,
    ) -> Result<Option<Decimal>, StoreError> {
        let target = self
            .series
            .get_mut(&series)
            .ok_or(StoreError::UnknownSeries(series))?;
        Ok(target.insert(competence, value, provenance))
    }

    pub fn get(&self, series: SeriesId) -> Option<&IndexSeries> {
        self.series.get(&series)
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl IndexStore for InMemoryIndexStore {
    fn resolve_name(&self, name: &str) -> Option<SeriesId> {
        self.names.get(name).copied()
    }

    fn series_name(&self, series: SeriesId) -> Option<String> {
        self.series.get(&series).map(|s| s.name().to_string())
    }

    fn lookup_at_or_before(&self, series: SeriesId, competence: Competence) -> Option<Decimal> {
        self.series.get(&series)?.value_at_or_before(competence)
    }

    fn lookup_range(&self, series: SeriesId, from: Competence, to: Competence) -> Vec<IndexPoint> {
        self.series
            .get(&series)
            .map(|s| s.points_in_range(from, to))
            .unwrap_or_default()
    }
}
