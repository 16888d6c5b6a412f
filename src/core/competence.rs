use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A calendar month, normalized to its first day.
///
/// Competences are the unit at which index values are published and at
/// which interest accrues. Any date inside a month maps to the same
/// competence.
///
/// # Examples
///
/// ```
/// use correction_engine::core::competence::Competence;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2021, 11, 17).unwrap();
/// let competence = Competence::from_date(date);
/// assert_eq!(competence.to_string(), "2021-11");
/// assert_eq!(competence.pred().to_string(), "2021-10");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Competence(NaiveDate);

/// Errors from parsing a competence label.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompetenceParseError {
    #[error("invalid competence '{0}', expected YYYY-MM or YYYY-MM-DD")]
    Malformed(String),
}

impl Competence {
    /// Build a competence from a year and a 1-based month.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The competence containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date - Days::new(u64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        let next = self.succ();
        if next == *self {
            return self.0;
        }
        next.0 - Days::new(1)
    }

    /// The previous month. Saturates at the calendar's lower bound.
    pub fn pred(&self) -> Self {
        Self(self.0.checked_sub_months(Months::new(1)).unwrap_or(self.0))
    }

    /// The next month. Saturates at the calendar's upper bound.
    pub fn succ(&self) -> Self {
        Self(self.0.checked_add_months(Months::new(1)).unwrap_or(self.0))
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: Competence) -> i64 {
        let years = i64::from(other.year()) - i64::from(self.year());
        let months = i64::from(other.month()) - i64::from(self.month());
        years * 12 + months
    }

    /// Every competence from `from` to `to`, inclusive and ascending.
    /// Empty when `from > to`.
    pub fn range_inclusive(from: Competence, to: Competence) -> Vec<Competence> {
        let mut months = Vec::new();
        let mut current = from;
        while current <= to {
            months.push(current);
            let next = current.succ();
            if next == current {
                break;
            }
            current = next;
        }
        months
    }
}

impl fmt::Display for Competence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Competence {
    type Err = CompetenceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Self::from_date(date));
        }
        let malformed = || CompetenceParseError::Malformed(s.to_string());
        let (year, month) = trimmed.split_once('-').ok_or_else(malformed)?;
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        Self::new(year, month).ok_or_else(malformed)
    }
}

impl TryFrom<String> for Competence {
    type Error = CompetenceParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Competence> for String {
    fn from(competence: Competence) -> Self {
        competence.to_string()
    }
}

impl From<NaiveDate> for Competence {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

/// Whole calendar months from `from` to `to`, truncated toward zero.
///
/// A month only counts once the day-of-month of `to` reaches the
/// day-of-month of `from`: Jan 31 to Feb 28 is zero months, Jan 15 to
/// Feb 15 is one.
pub fn whole_months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let packed = |d: NaiveDate| {
        (i64::from(d.year()) * 12 + i64::from(d.month0())) * 32 + i64::from(d.day())
    };
    (packed(to) - packed(from)) / 32
}

/// Whole calendar years from `from` to `to`, truncated toward zero.
pub fn whole_years_between(from: NaiveDate, to: NaiveDate) -> i64 {
    whole_months_between(from, to) / 12
}

/// Calendar days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
