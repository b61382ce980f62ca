//! Site-visit bookings.
//!
//! A visitor asks to see an active listing on a given day and time slot. The
//! listing owner confirms or rejects; either side may cancel while the visit
//! is still open.

use chrono::{Duration, NaiveDate};

use crate::domain::foundation::{
    string_enum, validation, BookingId, DomainError, ErrorCode, PropertyId, StateMachine,
    Timestamp, UserId,
};

/// How far ahead a visit may be booked.
pub const MAX_ADVANCE_DAYS: i64 = 90;

string_enum! {
    pub enum TimeSlot {
        Morning => "morning",
        Afternoon => "afternoon",
        Evening => "evening",
    }
}

string_enum! {
    pub enum BookingStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Rejected => "rejected",
        Cancelled => "cancelled",
        Completed => "completed",
    }
}

impl BookingStatus {
    /// Pending and confirmed visits count against the one-per-property rule.
    pub fn is_open(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

impl StateMachine for BookingStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use BookingStatus::*;
        match self {
            Pending => vec![Confirmed, Rejected, Cancelled],
            Confirmed => vec![Completed, Cancelled],
            Rejected | Cancelled | Completed => vec![],
        }
    }
}

/// Site-visit booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: BookingId,
    pub property_id: PropertyId,
    pub visitor_id: UserId,
    pub owner_id: UserId,
    pub visit_date: NaiveDate,
    pub time_slot: TimeSlot,
    pub contact_phone: String,
    pub message: Option<String>,
    pub status: BookingStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Validated booking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRequest {
    pub visit_date: NaiveDate,
    pub time_slot: TimeSlot,
    pub contact_phone: String,
    pub message: Option<String>,
}

impl VisitRequest {
    pub fn new(
        visit_date: NaiveDate,
        time_slot: &str,
        contact_phone: &str,
        message: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        if visit_date < today || visit_date > today + Duration::days(MAX_ADVANCE_DAYS) {
            return Err(DomainError::validation(
                "visit_date",
                format!("Visit date must be within the next {} days", MAX_ADVANCE_DAYS),
            ));
        }
        Ok(Self {
            visit_date,
            time_slot: time_slot.parse()?,
            contact_phone: validation::phone(contact_phone)?,
            message: validation::optional_text("message", message, 1000)?,
        })
    }
}

impl Booking {
    pub fn request(
        property_id: PropertyId,
        owner_id: UserId,
        visitor_id: UserId,
        request: VisitRequest,
    ) -> Result<Self, DomainError> {
        if visitor_id == owner_id {
            return Err(DomainError::validation(
                "property_id",
                "You cannot book a visit to your own property",
            ));
        }
        let now = Timestamp::now();
        Ok(Self {
            id: BookingId::new(),
            property_id,
            visitor_id,
            owner_id,
            visit_date: request.visit_date,
            time_slot: request.time_slot,
            contact_phone: request.contact_phone,
            message: request.message,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_participant(&self, user_id: &UserId) -> bool {
        &self.visitor_id == user_id || &self.owner_id == user_id
    }

    /// Owner-only transitions: confirm, reject, complete.
    pub fn owner_decide(&mut self, actor: &UserId, target: BookingStatus) -> Result<(), DomainError> {
        if actor != &self.owner_id {
            return Err(DomainError::forbidden("Only the property owner can do this"));
        }
        if !matches!(
            target,
            BookingStatus::Confirmed | BookingStatus::Rejected | BookingStatus::Completed
        ) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Owners cannot set status {}", target),
            ));
        }
        self.status = self.status.transition_to(target)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Either participant may cancel an open booking.
    pub fn cancel(&mut self, actor: &UserId) -> Result<(), DomainError> {
        if !self.is_participant(actor) {
            return Err(DomainError::forbidden("Not a participant in this booking"));
        }
        self.status = self.status.transition_to(BookingStatus::Cancelled)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn request(date: NaiveDate) -> Result<VisitRequest, DomainError> {
        VisitRequest::new(date, "morning", "9876543210", Some("  Keen buyer "), today())
    }

    fn booking() -> Booking {
        Booking::request(
            PropertyId::new(),
            UserId::new(),
            UserId::new(),
            request(today()).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn visit_date_window_is_enforced() {
        assert!(request(today() - Duration::days(1)).is_err());
        assert!(request(today() + Duration::days(MAX_ADVANCE_DAYS)).is_ok());
        assert!(request(today() + Duration::days(MAX_ADVANCE_DAYS + 1)).is_err());
    }

    #[test]
    fn message_is_trimmed() {
        assert_eq!(request(today()).unwrap().message.as_deref(), Some("Keen buyer"));
    }

    #[test]
    fn owner_cannot_book_own_property() {
        let owner = UserId::new();
        let err = Booking::request(PropertyId::new(), owner, owner, request(today()).unwrap())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn owner_confirms_then_completes() {
        let mut b = booking();
        let owner = b.owner_id;
        b.owner_decide(&owner, BookingStatus::Confirmed).unwrap();
        b.owner_decide(&owner, BookingStatus::Completed).unwrap();
        assert!(b.status.is_terminal());
    }

    #[test]
    fn visitor_cannot_confirm() {
        let mut b = booking();
        let visitor = b.visitor_id;
        let err = b.owner_decide(&visitor, BookingStatus::Confirmed).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn rejected_booking_cannot_be_cancelled() {
        let mut b = booking();
        let owner = b.owner_id;
        b.owner_decide(&owner, BookingStatus::Rejected).unwrap();
        let visitor = b.visitor_id;
        assert_eq!(
            b.cancel(&visitor).unwrap_err().code,
            ErrorCode::InvalidStateTransition
        );
    }

    #[test]
    fn stranger_cannot_cancel() {
        let mut b = booking();
        assert_eq!(b.cancel(&UserId::new()).unwrap_err().code, ErrorCode::Forbidden);
    }
}
