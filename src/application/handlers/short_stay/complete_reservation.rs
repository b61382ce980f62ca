//! CompleteReservationHandler - Host closes a finished stay.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ReservationId, Timestamp, UserId};
use crate::domain::short_stay::Reservation;
use crate::ports::ReservationRepository;

use super::load_reservation;

#[derive(Debug, Clone)]
pub struct CompleteReservationCommand {
    pub actor_id: UserId,
    pub reservation_id: ReservationId,
}

pub struct CompleteReservationHandler {
    reservations: Arc<dyn ReservationRepository>,
}

impl CompleteReservationHandler {
    pub fn new(reservations: Arc<dyn ReservationRepository>) -> Self {
        Self { reservations }
    }

    pub async fn handle(&self, cmd: CompleteReservationCommand) -> Result<Reservation, DomainError> {
        let mut reservation = load_reservation(&self.reservations, &cmd.reservation_id).await?;
        let expected = reservation.status;
        reservation.complete(&cmd.actor_id, Timestamp::now().date())?;
        self.reservations.update(&reservation, expected).await?;
        Ok(reservation)
    }
}
