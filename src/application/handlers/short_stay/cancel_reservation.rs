//! CancelReservationHandler - Guest or host cancels before check-in.

use std::sync::Arc;

use crate::application::Notifier;
use crate::domain::foundation::{DomainError, ReservationId, Timestamp, UserId};
use crate::domain::notification;
use crate::domain::short_stay::Reservation;
use crate::ports::{ReservationRepository, StayListingRepository, UserRepository};

use super::{email_guest, load_reservation};

#[derive(Debug, Clone)]
pub struct CancelReservationCommand {
    pub actor_id: UserId,
    pub reservation_id: ReservationId,
}

pub struct CancelReservationHandler {
    reservations: Arc<dyn ReservationRepository>,
    listings: Arc<dyn StayListingRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Notifier,
}

impl CancelReservationHandler {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        listings: Arc<dyn StayListingRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Notifier,
    ) -> Self {
        Self {
            reservations,
            listings,
            users,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: CancelReservationCommand) -> Result<Reservation, DomainError> {
        let mut reservation = load_reservation(&self.reservations, &cmd.reservation_id).await?;
        let expected = reservation.status;
        reservation.cancel(&cmd.actor_id, Timestamp::now().date())?;
        self.reservations.update(&reservation, expected).await?;

        email_guest(
            &self.listings,
            &self.users,
            &self.notifier,
            &reservation,
            notification::reservation_cancelled,
        )
        .await;
        tracing::info!(reservation_id = %reservation.id, actor = %cmd.actor_id, "Reservation cancelled");
        Ok(reservation)
    }
}
