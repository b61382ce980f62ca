//! Row conversion helpers shared by the PostgreSQL repositories.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, ValidationError};

/// Parses a TEXT status/category column into its domain enum.
///
/// A value the domain does not recognise means the row was written by
/// something else, so it surfaces as a database error rather than a
/// validation error.
pub(super) fn parse_column<T>(column: &str, value: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = ValidationError>,
{
    value.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid {} value: {}", column, value),
        )
    })
}

pub(super) fn ts(dt: DateTime<Utc>) -> Timestamp {
    Timestamp::from_datetime(dt)
}

pub(super) fn opt_ts(dt: Option<DateTime<Utc>>) -> Option<Timestamp> {
    dt.map(Timestamp::from_datetime)
}

pub(super) fn opt_dt(ts: &Option<Timestamp>) -> Option<DateTime<Utc>> {
    ts.map(|t| *t.as_datetime())
}

/// Error mapper for `map_err` on query futures.
pub(super) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::database(context, e)
}

pub(super) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint() == Some(constraint),
        _ => false,
    }
}

pub(super) fn total(count: i64) -> u64 {
    count.max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::live_group::UnitStatus;

    #[test]
    fn parse_column_accepts_domain_values() {
        let status: UnitStatus = parse_column("status", "locked").unwrap();
        assert_eq!(status, UnitStatus::Locked);
    }

    #[test]
    fn unknown_column_value_is_a_database_error() {
        let err = parse_column::<UnitStatus>("status", "sold_out").unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("sold_out"));
    }

    #[test]
    fn negative_counts_clamp_to_zero() {
        assert_eq!(total(-1), 0);
        assert_eq!(total(42), 42);
    }
}
