//! Live-group specific errors.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | ProjectNotLive | 409 |
//! | UnitUnavailable | 409 |
//! | NotLockHolder | 409 |
//! | LockExpired | 409 |
//! | LockLimitReached | 409 |
//! | VersionConflict | 409 |
//! | ProtectedUnits | 409 |
//! | InvalidHierarchy | 400 |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, UnitId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiveGroupError {
    #[error("Project is not open for bookings")]
    ProjectNotLive,

    #[error("Unit is not available")]
    UnitUnavailable(UnitId),

    #[error("You do not hold a lock on this unit")]
    NotLockHolder(UnitId),

    #[error("Your hold on this unit has expired")]
    LockExpired(UnitId),

    #[error("You can hold at most {max} unit(s) in this project at a time")]
    LockLimitReached { max: u32 },

    #[error("Project was modified by someone else (expected version {expected}, found {actual})")]
    VersionConflict { expected: i64, actual: i64 },

    #[error("{} unit(s) are booked or on hold and cannot be changed", .0.len())]
    ProtectedUnits(Vec<UnitId>),

    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(String),
}

impl LiveGroupError {
    pub fn invalid(message: impl Into<String>) -> Self {
        LiveGroupError::InvalidHierarchy(message.into())
    }
}

impl From<LiveGroupError> for DomainError {
    fn from(err: LiveGroupError) -> Self {
        let message = err.to_string();
        match err {
            LiveGroupError::ProjectNotLive => {
                DomainError::new(ErrorCode::InvalidStateTransition, message)
            }
            LiveGroupError::UnitUnavailable(id) => {
                DomainError::new(ErrorCode::UnitUnavailable, message).with_detail("unit_id", id.to_string())
            }
            LiveGroupError::NotLockHolder(id) | LiveGroupError::LockExpired(id) => {
                DomainError::new(ErrorCode::LockExpired, message).with_detail("unit_id", id.to_string())
            }
            LiveGroupError::LockLimitReached { max } => {
                DomainError::new(ErrorCode::LockLimitReached, message)
                    .with_detail("max_locks", max.to_string())
            }
            LiveGroupError::VersionConflict { expected, actual } => {
                DomainError::new(ErrorCode::VersionConflict, message)
                    .with_detail("expected_version", expected.to_string())
                    .with_detail("current_version", actual.to_string())
            }
            LiveGroupError::ProtectedUnits(ids) => {
                let joined = ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",");
                DomainError::new(ErrorCode::ProtectedUnits, message).with_detail("unit_ids", joined)
            }
            LiveGroupError::InvalidHierarchy(reason) => DomainError::validation("towers", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_units_lists_ids() {
        let a = UnitId::new();
        let b = UnitId::new();
        let err: DomainError = LiveGroupError::ProtectedUnits(vec![a, b]).into();
        assert_eq!(err.code, ErrorCode::ProtectedUnits);
        assert_eq!(err.details.get("unit_ids"), Some(&format!("{},{}", a, b)));
    }

    #[test]
    fn version_conflict_carries_both_versions() {
        let err: DomainError = LiveGroupError::VersionConflict { expected: 3, actual: 4 }.into();
        assert_eq!(err.code, ErrorCode::VersionConflict);
        assert_eq!(err.details.get("current_version"), Some(&"4".to_string()));
    }
}
