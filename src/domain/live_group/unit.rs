//! Units and the temporary hold ("lock") workflow.
//!
//! A hold reserves a unit for one buyer for a short window while they pay the
//! token amount. Holds are never trusted past `lock_expires_at`: an expired
//! hold reads as available everywhere, even before the sweep clears it.

use serde::Serialize;

use crate::domain::foundation::{
    string_enum, LiveBookingId, ProjectId, Timestamp, TowerId, UnitId, UserId,
};

use super::{LiveGroupError, ProjectStatus};

string_enum! {
    pub enum UnitStatus {
        Available => "available",
        Locked => "locked",
        Booked => "booked",
        /// Withheld from sale by an admin.
        Blocked => "blocked",
    }
}

/// Hold rules taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockPolicy {
    pub ttl_minutes: i64,
    pub max_locks_per_user: u32,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            ttl_minutes: 15,
            max_locks_per_user: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    pub id: UnitId,
    pub project_id: ProjectId,
    pub tower_id: TowerId,
    pub unit_number: String,
    pub floor: i32,
    pub unit_type: String,
    pub carpet_area_sqft: i64,
    pub price: i64,
    pub status: UnitStatus,
    pub locked_by: Option<UserId>,
    pub lock_expires_at: Option<Timestamp>,
    pub booked_by: Option<UserId>,
    pub booked_at: Option<Timestamp>,
    pub position: i32,
}

impl Unit {
    /// Status with expired holds treated as available.
    pub fn effective_status(&self, now: Timestamp) -> UnitStatus {
        match self.status {
            UnitStatus::Locked if !self.has_live_lock(now) => UnitStatus::Available,
            other => other,
        }
    }

    pub fn has_live_lock(&self, now: Timestamp) -> bool {
        self.status == UnitStatus::Locked
            && self.lock_expires_at.map(|at| at.is_after(&now)).unwrap_or(false)
    }

    pub fn is_held_by(&self, user_id: &UserId, now: Timestamp) -> bool {
        self.has_live_lock(now) && self.locked_by.as_ref() == Some(user_id)
    }

    /// Booked units and units under a live hold must not be altered by admins.
    pub fn is_protected(&self, now: Timestamp) -> bool {
        self.status == UnitStatus::Booked || self.has_live_lock(now)
    }

    /// Places or refreshes a hold for `user_id`.
    ///
    /// `held_elsewhere` is the number of other live holds the user has in the
    /// same project.
    pub fn acquire_lock(
        &mut self,
        user_id: UserId,
        project_status: ProjectStatus,
        held_elsewhere: u32,
        policy: &LockPolicy,
        now: Timestamp,
    ) -> Result<(), LiveGroupError> {
        if project_status != ProjectStatus::Live {
            return Err(LiveGroupError::ProjectNotLive);
        }
        let refreshing = self.is_held_by(&user_id, now);
        if !refreshing && self.effective_status(now) != UnitStatus::Available {
            return Err(LiveGroupError::UnitUnavailable(self.id));
        }
        if !refreshing && held_elsewhere >= policy.max_locks_per_user {
            return Err(LiveGroupError::LockLimitReached {
                max: policy.max_locks_per_user,
            });
        }
        self.status = UnitStatus::Locked;
        self.locked_by = Some(user_id);
        self.lock_expires_at = Some(now.plus_minutes(policy.ttl_minutes));
        Ok(())
    }

    /// Releases the caller's own live hold.
    pub fn release_lock(&mut self, user_id: &UserId, now: Timestamp) -> Result<(), LiveGroupError> {
        if !self.is_held_by(user_id, now) {
            return Err(LiveGroupError::NotLockHolder(self.id));
        }
        self.clear_lock();
        Ok(())
    }

    /// Converts the caller's live hold into a booking.
    pub fn book(
        &mut self,
        user_id: UserId,
        project_status: ProjectStatus,
        now: Timestamp,
    ) -> Result<(), LiveGroupError> {
        if project_status != ProjectStatus::Live {
            return Err(LiveGroupError::ProjectNotLive);
        }
        if !self.is_held_by(&user_id, now) {
            return Err(if self.locked_by == Some(user_id) {
                LiveGroupError::LockExpired(self.id)
            } else {
                LiveGroupError::NotLockHolder(self.id)
            });
        }
        self.status = UnitStatus::Booked;
        self.locked_by = None;
        self.lock_expires_at = None;
        self.booked_by = Some(user_id);
        self.booked_at = Some(now);
        Ok(())
    }

    /// Returns a booked unit to sale after an admin cancels the booking.
    pub fn unbook(&mut self) {
        self.status = UnitStatus::Available;
        self.booked_by = None;
        self.booked_at = None;
    }

    pub fn clear_lock(&mut self) {
        if self.status == UnitStatus::Locked {
            self.status = UnitStatus::Available;
        }
        self.locked_by = None;
        self.lock_expires_at = None;
    }
}

string_enum! {
    pub enum LiveBookingStatus {
        Confirmed => "confirmed",
        Cancelled => "cancelled",
    }
}

/// Confirmed purchase of a unit at the group price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveBooking {
    pub id: LiveBookingId,
    pub project_id: ProjectId,
    /// `None` once the unit was removed from the hierarchy; the record stays.
    pub unit_id: Option<UnitId>,
    pub user_id: UserId,
    pub list_price: i64,
    pub amount: i64,
    pub token_amount: i64,
    pub payment_reference: Option<String>,
    pub status: LiveBookingStatus,
    pub created_at: Timestamp,
    pub cancelled_at: Option<Timestamp>,
}

impl LiveBooking {
    pub fn confirmed(
        unit: &Unit,
        user_id: UserId,
        amount: i64,
        token_amount: i64,
        payment_reference: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: LiveBookingId::new(),
            project_id: unit.project_id,
            unit_id: Some(unit.id),
            user_id,
            list_price: unit.price,
            amount,
            token_amount,
            payment_reference,
            status: LiveBookingStatus::Confirmed,
            created_at: now,
            cancelled_at: None,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn available_unit() -> Unit {
        Unit {
            id: UnitId::new(),
            project_id: ProjectId::new(),
            tower_id: TowerId::new(),
            unit_number: "A-101".into(),
            floor: 1,
            unit_type: "2BHK".into(),
            carpet_area_sqft: 980,
            price: 6_500_000,
            status: UnitStatus::Available,
            locked_by: None,
            lock_expires_at: None,
            booked_by: None,
            booked_at: None,
            position: 0,
        }
    }

    fn policy() -> LockPolicy {
        LockPolicy::default()
    }

    #[test]
    fn lock_holds_for_ttl() {
        let mut unit = available_unit();
        let user = UserId::new();
        let now = Timestamp::now();
        unit.acquire_lock(user, ProjectStatus::Live, 0, &policy(), now).unwrap();
        assert!(unit.is_held_by(&user, now));
        assert!(!unit.has_live_lock(now.plus_minutes(15)));
        assert_eq!(unit.effective_status(now.plus_minutes(16)), UnitStatus::Available);
    }

    #[test]
    fn second_buyer_cannot_lock_held_unit() {
        let mut unit = available_unit();
        let now = Timestamp::now();
        unit.acquire_lock(UserId::new(), ProjectStatus::Live, 0, &policy(), now).unwrap();
        let err = unit
            .acquire_lock(UserId::new(), ProjectStatus::Live, 0, &policy(), now)
            .unwrap_err();
        assert_eq!(err, LiveGroupError::UnitUnavailable(unit.id));
    }

    #[test]
    fn expired_hold_can_be_taken_over() {
        let mut unit = available_unit();
        let now = Timestamp::now();
        unit.acquire_lock(UserId::new(), ProjectStatus::Live, 0, &policy(), now).unwrap();
        let later = now.plus_minutes(20);
        let other = UserId::new();
        unit.acquire_lock(other, ProjectStatus::Live, 0, &policy(), later).unwrap();
        assert!(unit.is_held_by(&other, later));
    }

    #[test]
    fn relocking_own_hold_refreshes_expiry() {
        let mut unit = available_unit();
        let user = UserId::new();
        let now = Timestamp::now();
        unit.acquire_lock(user, ProjectStatus::Live, 0, &policy(), now).unwrap();
        let later = now.plus_minutes(10);
        // Holding this unit counts towards the limit elsewhere but not here.
        unit.acquire_lock(user, ProjectStatus::Live, 1, &policy(), later).unwrap();
        assert_eq!(unit.lock_expires_at, Some(later.plus_minutes(15)));
    }

    #[test]
    fn lock_limit_is_enforced() {
        let mut unit = available_unit();
        let err = unit
            .acquire_lock(UserId::new(), ProjectStatus::Live, 1, &policy(), Timestamp::now())
            .unwrap_err();
        assert_eq!(err, LiveGroupError::LockLimitReached { max: 1 });
    }

    #[test]
    fn draft_project_refuses_locks() {
        let mut unit = available_unit();
        let err = unit
            .acquire_lock(UserId::new(), ProjectStatus::Draft, 0, &policy(), Timestamp::now())
            .unwrap_err();
        assert_eq!(err, LiveGroupError::ProjectNotLive);
    }

    #[test]
    fn blocked_unit_cannot_be_locked() {
        let mut unit = available_unit();
        unit.status = UnitStatus::Blocked;
        assert!(unit
            .acquire_lock(UserId::new(), ProjectStatus::Live, 0, &policy(), Timestamp::now())
            .is_err());
    }

    #[test]
    fn booking_requires_live_hold() {
        let mut unit = available_unit();
        let user = UserId::new();
        let now = Timestamp::now();
        assert_eq!(
            unit.book(user, ProjectStatus::Live, now),
            Err(LiveGroupError::NotLockHolder(unit.id))
        );
        unit.acquire_lock(user, ProjectStatus::Live, 0, &policy(), now).unwrap();
        assert_eq!(
            unit.book(user, ProjectStatus::Live, now.plus_minutes(30)),
            Err(LiveGroupError::LockExpired(unit.id))
        );
        unit.book(user, ProjectStatus::Live, now.plus_minutes(5)).unwrap();
        assert_eq!(unit.status, UnitStatus::Booked);
        assert_eq!(unit.booked_by, Some(user));
        assert!(unit.is_protected(now));
    }

    #[test]
    fn only_holder_releases() {
        let mut unit = available_unit();
        let user = UserId::new();
        let now = Timestamp::now();
        unit.acquire_lock(user, ProjectStatus::Live, 0, &policy(), now).unwrap();
        assert!(unit.release_lock(&UserId::new(), now).is_err());
        unit.release_lock(&user, now).unwrap();
        assert_eq!(unit.status, UnitStatus::Available);
        assert_eq!(unit.locked_by, None);
    }
}
