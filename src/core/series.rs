use crate::core::competence::Competence;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Consumer price index (IBGE), used for early federal condemnations.
pub const INPC: &str = "INPC";
/// Special broad consumer price index (IBGE).
pub const IPCA_E: &str = "IPCA_E";
/// General market price index (FGV).
pub const IGPM: &str = "IGPM";
/// Reference rate (BCB).
pub const TR: &str = "TR";
/// Central bank policy rate, as an accumulated index (BCB).
pub const SELIC: &str = "SELIC";

/// Unique identifier for an index series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(Uuid);

impl SeriesId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SeriesId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a series' values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesSource {
    Ibge,
    Bcb,
    Fgv,
    #[default]
    Manual,
}

impl SeriesSource {
    /// Whether the series is synchronized from an official provider API.
    pub fn is_official(&self) -> bool {
        !matches!(self, SeriesSource::Manual)
    }
}

/// How a single index value entered the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    ApiIbge,
    ApiBcb,
    ApiFgv,
    CsvImport,
    #[default]
    Manual,
}

/// One published index value for one competence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPoint {
    pub series: SeriesId,
    pub competence: Competence,
    pub value: Decimal,
    #[serde(default)]
    pub provenance: Provenance,
}

/// A named monetary index with its ordered values.
///
/// At most one value is held per competence; inserting a second value
/// for the same month replaces the first.
///
/// # Examples
///
/// ```
/// use correction_engine::core::competence::Competence;
/// use correction_engine::core::series::{IndexSeries, Provenance, SeriesSource};
/// use rust_decimal_macros::dec;
///
/// let mut ipca = IndexSeries::new("IPCA_E", SeriesSource::Ibge);
/// let nov = Competence::new(2021, 11).unwrap();
/// ipca.insert(nov, dec!(100.00000000), Provenance::ApiIbge);
///
/// let later = Competence::new(2022, 3).unwrap();
/// assert_eq!(ipca.value_at_or_before(later), Some(dec!(100.00000000)));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSeries {
    id: SeriesId,
    name: String,
    official_code: Option<String>,
    source: SeriesSource,
    points: BTreeMap<Competence, IndexPoint>,
}

impl IndexSeries {
    pub fn new(name: impl Into<String>, source: SeriesSource) -> Self {
        Self::with_id(SeriesId::new(), name, source)
    }

    /// Create a series with a specific ID (useful for testing / determinism).
    pub fn with_id(id: SeriesId, name: impl Into<String>, source: SeriesSource) -> Self {
        Self {
            id,
            name: name.into(),
            official_code: None,
            source,
            points: BTreeMap::new(),
        }
    }

    /// Set the provider's code for this series (e.g. the SGS series number).
    pub fn with_official_code(mut self, code: impl Into<String>) -> Self {
        self.official_code = Some(code.into());
        self
    }

    /// Insert or replace the value for `competence`. Returns the replaced value.
    pub fn insert(
        &mut self,
        competence: Competence,
        value: Decimal,
        provenance: Provenance,
    ) -> Option<Decimal> {
        let point = IndexPoint {
            series: self.id,
            competence,
            value,
            provenance,
        };
        self.points.insert(competence, point).map(|old| old.value)
    }

    pub fn id(&self) -> SeriesId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn official_code(&self) -> Option<&str> {
        self.official_code.as_deref()
    }

    pub fn source(&self) -> SeriesSource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent value published at or before `competence`.
    pub fn value_at_or_before(&self, competence: Competence) -> Option<Decimal> {
        self.points
            .range(..=competence)
            .next_back()
            .map(|(_, point)| point.value)
    }

    /// Points from `from` to `to`, inclusive and ascending.
    pub fn points_in_range(&self, from: Competence, to: Competence) -> Vec<IndexPoint> {
        if from > to {
            return Vec::new();
        }
        self.points
            .range(from..=to)
            .map(|(_, point)| point.clone())
            .collect()
    }

    /// All points, ascending.
    pub fn points(&self) -> impl Iterator<Item = &IndexPoint> {
        self.points.values()
    }
}
