//! Half-open stay date ranges.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::foundation::DomainError;

/// Nights from `check_in` up to but excluding `check_out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StayDates {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayDates {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, DomainError> {
        if check_out <= check_in {
            return Err(DomainError::validation(
                "check_out",
                "check_out must be after check_in",
            ));
        }
        Ok(Self { check_in, check_out })
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// True when the two ranges share at least one night.
    ///
    /// A stay ending on the day another begins does not overlap it.
    pub fn overlaps(&self, other: &StayDates) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Rejects past check-ins and check-ins beyond the booking horizon.
    pub fn check_window(&self, today: NaiveDate, max_advance_days: i64) -> Result<(), DomainError> {
        if self.check_in < today {
            return Err(DomainError::validation("check_in", "check_in cannot be in the past"));
        }
        if self.check_in > today + Duration::days(max_advance_days) {
            return Err(DomainError::validation(
                "check_in",
                format!("check_in must be within {} days", max_advance_days),
            ));
        }
        Ok(())
    }
}
