//! StartStayPaymentHandler - Opens a gateway order for a held reservation.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{validation, DomainError, ReservationId, Timestamp, UserId};
use crate::domain::short_stay::{Reservation, ReservationStatus};
use crate::ports::{GatewayOrder, PaymentGateway, ReservationRepository};

use super::load_reservation;

#[derive(Debug, Clone)]
pub struct StartStayPaymentCommand {
    pub guest_id: UserId,
    pub reservation_id: ReservationId,
}

#[derive(Debug, Clone, Serialize)]
pub struct StayPaymentOrder {
    pub order: GatewayOrder,
    pub reservation_id: ReservationId,
    pub amount: i64,
}

pub struct StartStayPaymentHandler {
    reservations: Arc<dyn ReservationRepository>,
    gateway: Arc<dyn PaymentGateway>,
}

impl StartStayPaymentHandler {
    pub fn new(reservations: Arc<dyn ReservationRepository>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            reservations,
            gateway,
        }
    }

    pub async fn handle(&self, cmd: StartStayPaymentCommand) -> Result<StayPaymentOrder, DomainError> {
        let mut reservation: Reservation = load_reservation(&self.reservations, &cmd.reservation_id).await?;
        if reservation.guest_id != cmd.guest_id {
            return Err(DomainError::forbidden("Only the guest can pay for this reservation"));
        }
        reservation.ensure_payable(Timestamp::now())?;

        let receipt = format!("stay_{}", reservation.id.as_uuid().simple());
        let amount_paise = validation::paise("total", reservation.total)?;
        let order = self.gateway.create_order(amount_paise, &receipt).await?;
        reservation.attach_order(order.order_id.clone());
        self.reservations
            .update(&reservation, ReservationStatus::Pending)
            .await?;

        tracing::info!(reservation_id = %reservation.id, order_id = %order.order_id, "Stay payment started");
        Ok(StayPaymentOrder {
            order,
            reservation_id: reservation.id,
            amount: reservation.total,
        })
    }
}
