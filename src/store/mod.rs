//! The index store contract and its implementations.
//!
//! The engine only ever reads from a store. Populating it (imports,
//! provider synchronization) happens elsewhere.

pub mod cache;
pub mod memory;

use crate::core::competence::Competence;
use crate::core::series::{IndexPoint, SeriesId};
use rust_decimal::Decimal;

/// Read access to published index values.
pub trait IndexStore {
    /// The ID of the series registered under `name`.
    fn resolve_name(&self, name: &str) -> Option<SeriesId>;

    /// Display name of a series.
    fn series_name(&self, series: SeriesId) -> Option<String>;

    /// The most recent value at or before `competence`.
    fn lookup_at_or_before(&self, series: SeriesId, competence: Competence) -> Option<Decimal>;

    /// Points from `from` to `to`, inclusive and ascending. Possibly empty.
    fn lookup_range(&self, series: SeriesId, from: Competence, to: Competence) -> Vec<IndexPoint>;

    /// The value published for exactly `competence`.
    fn lookup_exact(&self, series: SeriesId, competence: Competence) -> Option<Decimal> {
        self.lookup_range(series, competence, competence)
            .first()
            .map(|point| point.value)
    }
}

impl<S: IndexStore + ?Sized> IndexStore for &S {
    fn resolve_name(&self, name: &str) -> Option<SeriesId> {
        (**self).resolve_name(name)
    }

    fn series_name(&self, series: SeriesId) -> Option<String> {
        (**self).series_name(series)
    }

    fn lookup_at_or_before(&self, series: SeriesId, competence: Competence) -> Option<Decimal> {
        (**self).lookup_at_or_before(series, competence)
    }

    fn lookup_range(&self, series: SeriesId, from: Competence, to: Competence) -> Vec<IndexPoint> {
        (**self).lookup_range(series, from, to)
    }

    fn lookup_exact(&self, series: SeriesId, competence: Competence) -> Option<Decimal> {
        (**self).lookup_exact(series, competence)
    }
}
