//! ConfirmStayPaymentHandler - Confirms a reservation after checkout.

use std::sync::Arc;

use crate::application::Notifier;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::short_stay::Reservation;
use crate::ports::{PaymentGateway, ReservationRepository, StayListingRepository, UserRepository};

use super::confirm_paid_reservation;

#[derive(Debug, Clone)]
pub struct ConfirmStayPaymentCommand {
    pub guest_id: UserId,
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

pub struct ConfirmStayPaymentHandler {
    reservations: Arc<dyn ReservationRepository>,
    listings: Arc<dyn StayListingRepository>,
    users: Arc<dyn UserRepository>,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Notifier,
}

impl ConfirmStayPaymentHandler {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        listings: Arc<dyn StayListingRepository>,
        users: Arc<dyn UserRepository>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Notifier,
    ) -> Self {
        Self {
            reservations,
            listings,
            users,
            gateway,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: ConfirmStayPaymentCommand) -> Result<Reservation, DomainError> {
        self.gateway
            .verify_payment(&cmd.order_id, &cmd.payment_id, &cmd.signature)?;

        let reservation = self
            .reservations
            .find_by_order_id(&cmd.order_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(ErrorCode::ReservationNotFound, "Reservation", &cmd.order_id)
            })?;
        if reservation.guest_id != cmd.guest_id {
            return Err(DomainError::forbidden("This order belongs to another guest"));
        }

        confirm_paid_reservation(
            &self.reservations,
            &self.listings,
            &self.users,
            &self.notifier,
            reservation,
            cmd.payment_id,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::adapters::razorpay::MockPaymentGateway;
    use crate::application::handlers::short_stay::fixtures::{day, listing};
    use crate::application::handlers::short_stay::{
        ReserveStayCommand, ReserveStayHandler, StartStayPaymentCommand, StartStayPaymentHandler,
    };
    use crate::application::handlers::test_support::verified_user;
    use crate::application::notifier::tests::{recording_notifier, settle};
    use crate::domain::short_stay::ReservationStatus;

    #[tokio::test]
    async fn reserve_pay_confirm_flow() {
        let store = InMemoryStore::new();
        let shared = Arc::new(store.clone());
        let gateway = Arc::new(MockPaymentGateway::new());
        let (notifier, sender) = recording_notifier();
        let host = verified_user(&store, "host@example.com").await;
        let guest = verified_user(&store, "guest@example.com").await;
        let l = listing(&store, &host).await;

        let held = ReserveStayHandler::new(shared.clone(), shared.clone(), 30, 365)
            .handle(ReserveStayCommand {
                guest_id: guest.id,
                listing_id: l.id,
                check_in: day(20),
                check_out: day(22),
                guests: 1,
            })
            .await
            .unwrap();
        let payment = StartStayPaymentHandler::new(shared.clone(), gateway.clone())
            .handle(StartStayPaymentCommand {
                guest_id: guest.id,
                reservation_id: held.id,
            })
            .await
            .unwrap();
        assert_eq!(payment.order.amount_paise, held.total * 100);

        let confirm = ConfirmStayPaymentHandler::new(
            shared.clone(),
            shared.clone(),
            shared,
            gateway,
            notifier,
        );
        let cmd = ConfirmStayPaymentCommand {
            guest_id: guest.id,
            order_id: payment.order.order_id.clone(),
            payment_id: "pay_stay".into(),
            signature: MockPaymentGateway::SIGNATURE.into(),
        };
        let confirmed = confirm.handle(cmd.clone()).await.unwrap();
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);
        assert_eq!(confirmed.hold_expires_at, None);

        // Replayed callback is a no-op.
        confirm.handle(cmd).await.unwrap();
        settle().await;
        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, guest.email);
    }
}
