//! Closed date range used for product reservations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::InvalidValueObject;

/// Message recorded when `end` precedes `start`.
pub const END_BEFORE_START_MESSAGE: &str = "End date cannot be before start date";

/// Inclusive `[start, end]` date range.
///
/// ## Invariants
/// - `end >= start`.
///
/// # Examples
/// ```
/// use atelier::domain::Period;
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2026, 3, d).expect("valid date");
/// let period = Period::new(day(10), day(12)).expect("ordered dates");
/// assert!(period.contains(day(12)));
/// assert!(!period.contains(day(13)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "PeriodDto", into = "PeriodDto")]
pub struct Period {
    start: NaiveDate,
    end: NaiveDate,
}

impl Period {
    /// Build a period, rejecting an `end` before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidValueObject> {
        if end < start {
            return Err(InvalidValueObject::new(END_BEFORE_START_MESSAGE));
        }
        Ok(Self { start, end })
    }

    /// Single-day period.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// First day.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day, inclusive.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// True when `date` falls within the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// True when the two ranges share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

#[derive(Serialize, Deserialize)]
struct PeriodDto {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<PeriodDto> for Period {
    type Error = InvalidValueObject;

    fn try_from(value: PeriodDto) -> Result<Self, Self::Error> {
        Self::new(value.start, value.end)
    }
}

impl From<Period> for PeriodDto {
    fn from(value: Period) -> Self {
        Self {
            start: value.start,
            end: value.end,
        }
    }
}
