use crate::core::competence::Competence;
use crate::core::series::{IndexPoint, SeriesId};
use crate::store::IndexStore;
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::collections::HashMap;

/// Memoizes lookups against an underlying store for the lifetime of one
/// calculation.
///
/// The same (series, competence) pair is asked for repeatedly when
/// several installments share a series or when the month loop looks up
/// both the current and the previous month. A fresh cache is built per
/// calculation call and dropped with it, so nothing leaks between
/// requests. Not `Sync`.
pub struct CachedIndexStore<'a, S: IndexStore + ?Sized> {
    inner: &'a S,
    names: RefCell<HashMap<String, Option<SeriesId>>>,
    series_names: RefCell<HashMap<SeriesId, Option<String>>>,
    at_or_before: RefCell<HashMap<(SeriesId, Competence), Option<Decimal>>>,
    ranges: RefCell<HashMap<(SeriesId, Competence, Competence), Vec<IndexPoint>>>,
}

impl<'a, S: IndexStore + ?Sized> CachedIndexStore<'a, S> {
    pub fn new(inner: &'a S) -> Self {
        Self {
            inner,
            names: RefCell::new(HashMap::new()),
            series_names: RefCell::new(HashMap::new()),
            at_or_before: RefCell::new(HashMap::new()),
            ranges: RefCell::new(HashMap::new()),
        }
    }

    /// Number of distinct lookups memoized so far.
    pub fn cached_lookups(&self) -> usize {
        self.at_or_before.borrow().len() + self.ranges.borrow().len()
    }
}

impl<S: IndexStore + ?Sized> IndexStore for CachedIndexStore<'_, S> {
    fn resolve_name(&self, name: &str) -> Option<SeriesId> {
        if let Some(hit) = self.names.borrow().get(name) {
            return *hit;
        }
        let resolved = self.inner.resolve_name(name);
        self.names.borrow_mut().insert(name.to_string(), resolved);
        resolved
    }

    fn series_name(&self, series: SeriesId) -> Option<String> {
        if let Some(hit) = self.series_names.borrow().get(&series) {
            return hit.clone();
        }
        let name = self.inner.series_name(series);
        self.series_names.borrow_mut().insert(series, name.clone());
        name
    }

    fn lookup_at_or_before(&self, series: SeriesId, competence: Competence) -> Option<Decimal> {
        let key = (series, competence);
        if let Some(hit) = self.at_or_before.borrow().get(&key) {
            return *hit;
        }
        let value = self.inner.lookup_at_or_before(series, competence);
        self.at_or_before.borrow_mut().insert(key, value);
        value
    }

    fn lookup_range(&self, series: SeriesId, from: Competence, to: Competence) -> Vec<IndexPoint> {
        let key = (series, from, to);
        if let Some(hit) = self.ranges.borrow().get(&key) {
            return hit.clone();
        }
        let points = self.inner.lookup_range(series, from, to);
        self.ranges.borrow_mut().insert(key, points.clone());
        points
    }
}
