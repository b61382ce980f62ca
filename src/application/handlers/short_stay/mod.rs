//! Short-stay handlers.
//!
//! ## Commands
//! - `CreateStayListingHandler`, `UpdateStayListingHandler`, `DeleteStayListingHandler`
//! - `ReserveStayHandler` - Places a payment hold on free dates
//! - `StartStayPaymentHandler` - Gateway order for a held reservation
//! - `ConfirmStayPaymentHandler` - Checkout callback signature check
//! - `CancelReservationHandler`, `CompleteReservationHandler`
//!
//! ## Queries
//! - `GetStayListingHandler` - Public for active listings, hosts see their own
//! - `GetAvailabilityHandler` - Blocked ranges inside a window
//! - `QuoteStayHandler` - Price breakdown without reserving

mod cancel_reservation;
mod complete_reservation;
mod confirm_payment;
mod create_listing;
mod delete_listing;
mod get_availability;
mod get_listing;
mod quote_stay;
mod reserve_stay;
mod start_payment;
mod update_listing;

pub use cancel_reservation::{CancelReservationCommand, CancelReservationHandler};
pub use complete_reservation::{CompleteReservationCommand, CompleteReservationHandler};
pub use confirm_payment::{ConfirmStayPaymentCommand, ConfirmStayPaymentHandler};
pub use create_listing::{CreateStayListingCommand, CreateStayListingHandler};
pub use delete_listing::{DeleteStayListingCommand, DeleteStayListingHandler};
pub use get_availability::{Availability, GetAvailabilityHandler, GetAvailabilityQuery};
pub use get_listing::{GetStayListingHandler, GetStayListingQuery};
pub use quote_stay::{QuoteStayHandler, QuoteStayQuery};
pub use reserve_stay::{ReserveStayCommand, ReserveStayHandler};
pub use start_payment::{StartStayPaymentCommand, StartStayPaymentHandler, StayPaymentOrder};
pub use update_listing::{UpdateStayListingCommand, UpdateStayListingHandler};

use std::sync::Arc;

use crate::application::Notifier;
use crate::domain::foundation::{DomainError, ErrorCode, ListingId, ReservationId, Timestamp};
use crate::domain::notification::{self, StaySummary};
use crate::domain::short_stay::{Reservation, ReservationStatus, StayListing};
use crate::ports::{ReservationRepository, StayListingRepository, UserRepository};

pub(crate) async fn load_listing(
    listings: &Arc<dyn StayListingRepository>,
    id: &ListingId,
) -> Result<StayListing, DomainError> {
    listings
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(ErrorCode::ListingNotFound, "Listing", id))
}

pub(crate) async fn load_reservation(
    reservations: &Arc<dyn ReservationRepository>,
    id: &ReservationId,
) -> Result<Reservation, DomainError> {
    reservations
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(ErrorCode::ReservationNotFound, "Reservation", id))
}

/// Confirms a paid reservation and emails the guest.
///
/// A reservation already confirmed with the same payment is returned as is.
pub(crate) async fn confirm_paid_reservation(
    reservations: &Arc<dyn ReservationRepository>,
    listings: &Arc<dyn StayListingRepository>,
    users: &Arc<dyn UserRepository>,
    notifier: &Notifier,
    mut reservation: Reservation,
    payment_id: String,
) -> Result<Reservation, DomainError> {
    if reservation.status == ReservationStatus::Confirmed
        && reservation.payment_id.as_deref() == Some(payment_id.as_str())
    {
        return Ok(reservation);
    }

    let expected = reservation.status;
    reservation.confirm(payment_id, Timestamp::now())?;
    reservations.update(&reservation, expected).await?;

    email_guest(listings, users, notifier, &reservation, notification::reservation_confirmed).await;
    tracing::info!(reservation_id = %reservation.id, "Reservation confirmed");
    Ok(reservation)
}

type StayTemplate = fn(&notification::Branding, &str, &str, &StaySummary<'_>) -> notification::EmailMessage;

/// Best-effort guest email; lookup failures are logged.
pub(crate) async fn email_guest(
    listings: &Arc<dyn StayListingRepository>,
    users: &Arc<dyn UserRepository>,
    notifier: &Notifier,
    reservation: &Reservation,
    template: StayTemplate,
) {
    let lookup = async {
        let guest = users.find_by_id(&reservation.guest_id).await?;
        let listing = listings.find_by_id(&reservation.listing_id).await?;
        Ok::<_, DomainError>((guest, listing))
    };
    match lookup.await {
        Ok((Some(guest), listing)) => {
            let title = listing.map(|l| l.details.title).unwrap_or_default();
            notifier.dispatch(template(
                notifier.branding(),
                &guest.email,
                &guest.name,
                &StaySummary {
                    listing_title: &title,
                    check_in: reservation.dates.check_in,
                    check_out: reservation.dates.check_out,
                    guests: reservation.guests,
                    total: reservation.total,
                },
            ));
        }
        Ok((None, _)) => {}
        Err(e) => tracing::warn!(reservation_id = %reservation.id, error = %e, "Stay email skipped"),
    }
}
