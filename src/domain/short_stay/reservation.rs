//! Reservations against short-stay listings.
//!
//! A reservation starts `Pending` with a payment hold. While the hold is
//! unexpired it blocks the dates exactly like a confirmed stay; once it lapses
//! the dates are free again and the sweep cancels it.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::foundation::{
    string_enum, DomainError, ErrorCode, ListingId, ReservationId, StateMachine, Timestamp,
    UserId,
};

use super::{StayDates, StayListing};

string_enum! {
    pub enum ReservationStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Cancelled => "cancelled",
        Completed => "completed",
    }
}

impl StateMachine for ReservationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ReservationStatus::*;
        match self {
            Pending => vec![Confirmed, Cancelled],
            Confirmed => vec![Completed, Cancelled],
            Cancelled | Completed => vec![],
        }
    }
}

/// Price breakdown for a stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StayQuote {
    pub nights: i64,
    pub nightly_rate: i64,
    pub cleaning_fee: i64,
    pub subtotal: i64,
    pub total: i64,
}

impl StayQuote {
    /// Checks the stay against the listing's rules and prices it.
    pub fn for_listing(
        listing: &StayListing,
        dates: &StayDates,
        guests: i32,
    ) -> Result<Self, DomainError> {
        let d = &listing.details;
        let nights = dates.nights();
        if nights < d.min_nights as i64 || nights > d.max_nights as i64 {
            return Err(DomainError::validation(
                "check_out",
                format!("Stay must be {}-{} nights", d.min_nights, d.max_nights),
            ));
        }
        if guests < 1 || guests > d.max_guests {
            return Err(DomainError::validation(
                "guests",
                format!("This listing hosts 1-{} guests", d.max_guests),
            ));
        }
        Self::compute(nights, d.nightly_rate, d.cleaning_fee)
    }

    pub fn compute(nights: i64, nightly_rate: i64, cleaning_fee: i64) -> Result<Self, DomainError> {
        let too_large = || DomainError::validation("total", "Stay total is too large to charge");
        let subtotal = nights.checked_mul(nightly_rate).ok_or_else(too_large)?;
        let total = subtotal.checked_add(cleaning_fee).ok_or_else(too_large)?;
        Ok(Self {
            nights,
            nightly_rate,
            cleaning_fee,
            subtotal,
            total,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: ReservationId,
    pub listing_id: ListingId,
    pub guest_id: UserId,
    pub host_id: UserId,
    pub dates: StayDates,
    pub guests: i32,
    pub nightly_rate: i64,
    pub cleaning_fee: i64,
    pub total: i64,
    pub status: ReservationStatus,
    pub hold_expires_at: Option<Timestamp>,
    pub payment_order_id: Option<String>,
    pub payment_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Reservation {
    /// Creates a pending reservation with a payment hold.
    pub fn hold(
        listing: &StayListing,
        guest_id: UserId,
        dates: StayDates,
        guests: i32,
        hold_minutes: i64,
        now: Timestamp,
    ) -> Result<Self, DomainError> {
        if listing.host_id == guest_id {
            return Err(DomainError::validation(
                "listing_id",
                "Hosts cannot reserve their own listing",
            ));
        }
        if !listing.is_bookable() {
            return Err(DomainError::new(
                ErrorCode::DatesUnavailable,
                "Listing is not accepting reservations",
            ));
        }
        let quote = StayQuote::for_listing(listing, &dates, guests)?;
        Ok(Self {
            id: ReservationId::new(),
            listing_id: listing.id,
            guest_id,
            host_id: listing.host_id,
            dates,
            guests,
            nightly_rate: quote.nightly_rate,
            cleaning_fee: quote.cleaning_fee,
            total: quote.total,
            status: ReservationStatus::Pending,
            hold_expires_at: Some(now.plus_minutes(hold_minutes)),
            payment_order_id: None,
            payment_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether this reservation currently keeps its dates off the market.
    pub fn blocks_dates(&self, now: Timestamp) -> bool {
        match self.status {
            ReservationStatus::Confirmed => true,
            ReservationStatus::Pending => self.hold_is_live(now),
            ReservationStatus::Cancelled | ReservationStatus::Completed => false,
        }
    }

    pub fn hold_is_live(&self, now: Timestamp) -> bool {
        self.hold_expires_at.map(|at| at.is_after(&now)).unwrap_or(false)
    }

    /// Whether this copy may overwrite `stored`, read earlier in `expected`.
    ///
    /// The stored status must be unchanged, and a pending row only moves on
    /// while its hold is live at this copy's `updated_at`, unless it is being
    /// cancelled.
    pub fn may_replace(&self, stored: &Reservation, expected: ReservationStatus) -> bool {
        if stored.status != expected {
            return false;
        }
        stored.status != ReservationStatus::Pending
            || self.status == ReservationStatus::Cancelled
            || stored.hold_is_live(self.updated_at)
    }

    pub fn is_participant(&self, user_id: &UserId) -> bool {
        &self.guest_id == user_id || &self.host_id == user_id
    }

    /// Payment may start only for a pending reservation whose hold is live.
    pub fn ensure_payable(&self, now: Timestamp) -> Result<(), DomainError> {
        if self.status != ReservationStatus::Pending {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Reservation is {}", self.status),
            ));
        }
        if !self.hold_is_live(now) {
            return Err(DomainError::new(
                ErrorCode::DatesUnavailable,
                "Reservation hold has expired; please reserve again",
            ));
        }
        Ok(())
    }

    pub fn attach_order(&mut self, order_id: String) {
        self.payment_order_id = Some(order_id);
        self.updated_at = Timestamp::now();
    }

    pub fn confirm(&mut self, payment_id: String, now: Timestamp) -> Result<(), DomainError> {
        self.ensure_payable(now)?;
        self.status = self.status.transition_to(ReservationStatus::Confirmed)?;
        self.payment_id = Some(payment_id);
        self.hold_expires_at = None;
        self.updated_at = now;
        Ok(())
    }

    /// Guest or host may cancel before check-in.
    pub fn cancel(&mut self, actor: &UserId, today: NaiveDate) -> Result<(), DomainError> {
        if !self.is_participant(actor) {
            return Err(DomainError::forbidden("Not a participant in this reservation"));
        }
        if today >= self.dates.check_in {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Reservations cannot be cancelled on or after check-in",
            ));
        }
        self.status = self.status.transition_to(ReservationStatus::Cancelled)?;
        self.hold_expires_at = None;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Host marks a stay completed once check-out has passed.
    pub fn complete(&mut self, actor: &UserId, today: NaiveDate) -> Result<(), DomainError> {
        if actor != &self.host_id {
            return Err(DomainError::forbidden("Only the host can complete a stay"));
        }
        if today < self.dates.check_out {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Stay cannot be completed before check-out",
            ));
        }
        self.status = self.status.transition_to(ReservationStatus::Completed)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

/// A guarded reservation write found the row already moved on.
pub fn reservation_changed() -> DomainError {
    DomainError::new(
        ErrorCode::Conflict,
        "Reservation changed while this request was in progress; reload it and retry",
    )
}

/// Returns the first existing reservation that blocks `dates`.
pub fn find_conflict<'a>(
    dates: &StayDates,
    existing: &'a [Reservation],
    now: Timestamp,
) -> Option<&'a Reservation> {
    existing
        .iter()
        .find(|r| r.blocks_dates(now) && r.dates.overlaps(dates))
}
