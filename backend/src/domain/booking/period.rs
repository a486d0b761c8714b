//! Pick-up and return dates of a booking.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{InvalidValueObject, Period};

/// Recorded when the pick-up date falls after the return date.
pub const PICK_UP_AFTER_RETURN: &str = "Pick up date cannot be after return date";
/// Recorded when the pick-up date is before today.
pub const PICK_UP_IN_PAST: &str = "Pick up date cannot be in the past";
/// Recorded when the return date is before today.
pub const RETURN_IN_PAST: &str = "Return date cannot be in the past";

/// Pick-up date plus an optional return date.
///
/// ## Invariants
/// - `pick_up_date <= return_date` when a return date is present.
/// - Neither date is before `today` when built through [`Self::create`].
///
/// # Examples
/// ```
/// use atelier::domain::BookingPeriod;
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2026, 3, d).expect("valid date");
/// let err = BookingPeriod::create(day(12), Some(day(10)), day(1)).expect_err("unordered");
/// assert_eq!(err.errors(), ["Pick up date cannot be after return date"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingPeriod {
    pick_up_date: NaiveDate,
    return_date: Option<NaiveDate>,
}

impl BookingPeriod {
    /// Validate a new period against `today`, collecting every violation.
    pub fn create(
        pick_up_date: NaiveDate,
        return_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, InvalidValueObject> {
        let mut errors = Vec::new();
        if return_date.is_some_and(|ret| pick_up_date > ret) {
            errors.push(PICK_UP_AFTER_RETURN);
        }
        if pick_up_date < today {
            errors.push(PICK_UP_IN_PAST);
        }
        if return_date.is_some_and(|ret| ret < today) {
            errors.push(RETURN_IN_PAST);
        }
        if errors.is_empty() {
            Ok(Self {
                pick_up_date,
                return_date,
            })
        } else {
            Err(InvalidValueObject::from_errors(errors))
        }
    }

    /// Rebuild from stored dates without checks.
    pub const fn restore(pick_up_date: NaiveDate, return_date: Option<NaiveDate>) -> Self {
        Self {
            pick_up_date,
            return_date,
        }
    }

    /// Pick-up date.
    pub const fn pick_up_date(&self) -> NaiveDate {
        self.pick_up_date
    }

    /// Return date, when agreed.
    pub const fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    /// Same pick-up date with `return_date` set.
    pub const fn with_return_date(self, return_date: NaiveDate) -> Self {
        Self {
            pick_up_date: self.pick_up_date,
            return_date: Some(return_date),
        }
    }

    /// Range the booked products are held for.
    ///
    /// Without a return date the products stay reserved until the event
    /// day, or just the pick-up day when the event is earlier.
    pub fn reservation(&self, event_date: NaiveDate) -> Period {
        let end = self
            .return_date
            .unwrap_or_else(|| self.pick_up_date.max(event_date));
        Period::new(self.pick_up_date, end).unwrap_or_else(|_| Period::single_day(self.pick_up_date))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).expect("valid fixture date")
    }

    #[rstest]
    #[case(day(10), Some(day(12)), day(1), &[])]
    #[case(day(10), None, day(10), &[])]
    #[case(day(12), Some(day(10)), day(1), &[PICK_UP_AFTER_RETURN])]
    #[case(day(5), Some(day(12)), day(6), &[PICK_UP_IN_PAST])]
    #[case(day(5), Some(day(6)), day(8), &[PICK_UP_IN_PAST, RETURN_IN_PAST])]
    #[case(day(9), Some(day(4)), day(8), &[PICK_UP_AFTER_RETURN, RETURN_IN_PAST])]
    fn create_collects_every_violation(
        #[case] pick_up: NaiveDate,
        #[case] return_date: Option<NaiveDate>,
        #[case] today: NaiveDate,
        #[case] expected: &[&str],
    ) {
        match BookingPeriod::create(pick_up, return_date, today) {
            Ok(_) => assert!(expected.is_empty()),
            Err(err) => assert_eq!(err.errors(), expected),
        }
    }

    #[rstest]
    #[case(Some(day(14)), day(20), (day(10), day(14)))]
    #[case(None, day(20), (day(10), day(20)))]
    #[case(None, day(2), (day(10), day(10)))]
    fn reservation_uses_return_or_event_date(
        #[case] return_date: Option<NaiveDate>,
        #[case] event_date: NaiveDate,
        #[case] expected: (NaiveDate, NaiveDate),
    ) {
        let period = BookingPeriod::restore(day(10), return_date).reservation(event_date);
        assert_eq!((period.start(), period.end()), expected);
    }

    #[rstest]
    fn restore_skips_checks() {
        let period = BookingPeriod::restore(day(12), Some(day(10)));
        assert_eq!(period.return_date(), Some(day(10)));
    }
}
