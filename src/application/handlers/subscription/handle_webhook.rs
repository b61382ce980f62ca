//! HandlePaymentWebhookHandler - Applies gateway webhook deliveries.
//!
//! Orders are matched against subscriptions first, then short-stay
//! reservations. Deliveries for unknown orders, already-settled orders and
//! unrelated events are acknowledged without changes so the gateway stops
//! retrying.

use std::sync::Arc;

use crate::application::handlers::short_stay::confirm_paid_reservation;
use crate::application::Notifier;
use crate::domain::foundation::{DomainError, ReservationId, SubscriptionId};
use crate::domain::short_stay::ReservationStatus;
use crate::domain::subscription::{PaymentOutcome, RazorpayEvent, SubscriptionStatus};
use crate::ports::{
    PaymentGateway, ReservationRepository, StayListingRepository, SubscriptionRepository,
    UserRepository,
};

use super::activate_paid;

#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw request body exactly as signed.
    pub body: Vec<u8>,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    SubscriptionActivated(SubscriptionId),
    SubscriptionFailed(SubscriptionId),
    ReservationConfirmed(ReservationId),
    Ignored,
}

pub struct HandlePaymentWebhookHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    reservations: Arc<dyn ReservationRepository>,
    listings: Arc<dyn StayListingRepository>,
    users: Arc<dyn UserRepository>,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Notifier,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        reservations: Arc<dyn ReservationRepository>,
        listings: Arc<dyn StayListingRepository>,
        users: Arc<dyn UserRepository>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Notifier,
    ) -> Self {
        Self {
            subscriptions,
            reservations,
            listings,
            users,
            gateway,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: HandlePaymentWebhookCommand) -> Result<WebhookOutcome, DomainError> {
        // 1. Authenticate the delivery
        self.gateway.verify_webhook(&cmd.body, &cmd.signature)?;

        // 2. Parse only what settlement needs
        let event: RazorpayEvent = serde_json::from_slice(&cmd.body)
            .map_err(|e| DomainError::validation("body", format!("Malformed webhook payload: {}", e)))?;

        let outcome = match event.outcome() {
            PaymentOutcome::Captured { order_id, payment_id } => {
                self.captured(&order_id, payment_id).await?
            }
            PaymentOutcome::Failed { order_id, .. } => self.failed(&order_id).await?,
            PaymentOutcome::Ignored => WebhookOutcome::Ignored,
        };

        tracing::info!(event = %event.event, outcome = ?outcome, "Payment webhook processed");
        Ok(outcome)
    }

    async fn captured(&self, order_id: &str, payment_id: String) -> Result<WebhookOutcome, DomainError> {
        if let Some(subscription) = self.subscriptions.find_by_order_id(order_id).await? {
            if !matches!(subscription.status, SubscriptionStatus::Pending)
                && subscription.gateway_payment_id.as_deref() != Some(payment_id.as_str())
            {
                return Ok(WebhookOutcome::Ignored);
            }
            let activated = activate_paid(
                &self.subscriptions,
                &self.users,
                &self.notifier,
                subscription,
                payment_id,
            )
            .await?;
            return Ok(WebhookOutcome::SubscriptionActivated(activated.id));
        }

        if let Some(reservation) = self.reservations.find_by_order_id(order_id).await? {
            let id = reservation.id;
            return match confirm_paid_reservation(
                &self.reservations,
                &self.listings,
                &self.users,
                &self.notifier,
                reservation,
                payment_id,
            )
            .await
            {
                Ok(_) => Ok(WebhookOutcome::ReservationConfirmed(id)),
                Err(e) => {
                    // Captured money on a lapsed hold needs a manual refund.
                    tracing::error!(reservation_id = %id, order_id, error = %e, "Captured payment could not confirm reservation");
                    Ok(WebhookOutcome::Ignored)
                }
            };
        }

        tracing::warn!(order_id, "Webhook for unknown order");
        Ok(WebhookOutcome::Ignored)
    }

    async fn failed(&self, order_id: &str) -> Result<WebhookOutcome, DomainError> {
        if let Some(mut subscription) = self.subscriptions.find_by_order_id(order_id).await? {
            if subscription.status != SubscriptionStatus::Pending {
                return Ok(WebhookOutcome::Ignored);
            }
            subscription.fail()?;
            self.subscriptions.update(&subscription).await?;
            return Ok(WebhookOutcome::SubscriptionFailed(subscription.id));
        }

        // A failed stay payment leaves the hold to lapse on its own.
        if let Some(reservation) = self.reservations.find_by_order_id(order_id).await? {
            if reservation.status == ReservationStatus::Pending {
                tracing::info!(reservation_id = %reservation.id, "Stay payment failed; hold left to lapse");
            }
        }
        Ok(WebhookOutcome::Ignored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::adapters::razorpay::MockPaymentGateway;
    use crate::application::handlers::test_support::verified_user;
    use crate::application::notifier::tests::recording_notifier;
    use crate::domain::foundation::{ErrorCode, Timestamp, UserId};
    use crate::domain::short_stay::{sample_listing_input, Reservation, StayDates, StayListing};
    use crate::domain::subscription::{PlanCode, Subscription};

    fn handler(store: &InMemoryStore) -> HandlePaymentWebhookHandler {
        let (notifier, _) = recording_notifier();
        let shared = Arc::new(store.clone());
        HandlePaymentWebhookHandler::new(
            shared.clone(),
            shared.clone(),
            shared.clone(),
            shared,
            Arc::new(MockPaymentGateway::new()),
            notifier,
        )
    }

    fn delivery(event: &str, order_id: &str) -> HandlePaymentWebhookCommand {
        let body = serde_json::json!({
            "event": event,
            "payload": { "payment": { "entity": {
                "id": "pay_hook", "order_id": order_id, "amount": 99900, "status": "captured"
            }}}
        });
        HandlePaymentWebhookCommand {
            body: serde_json::to_vec(&body).unwrap(),
            signature: MockPaymentGateway::SIGNATURE.into(),
        }
    }

    #[tokio::test]
    async fn captured_payment_activates_subscription_once() {
        let store = InMemoryStore::new();
        let user = verified_user(&store, "asha@example.com").await;
        let pending = Subscription::pending(user.id, PlanCode::Basic, "order_9".into());
        SubscriptionRepository::create(&store, &pending).await.unwrap();
        let handler = handler(&store);

        let first = handler.handle(delivery("payment.captured", "order_9")).await.unwrap();
        assert_eq!(first, WebhookOutcome::SubscriptionActivated(pending.id));
        let again = handler.handle(delivery("payment.captured", "order_9")).await.unwrap();
        assert_eq!(again, WebhookOutcome::SubscriptionActivated(pending.id));

        let current = store.find_current(&user.id, Timestamp::now()).await.unwrap().unwrap();
        assert_eq!(current.gateway_payment_id.as_deref(), Some("pay_hook"));
    }

    #[tokio::test]
    async fn failed_payment_fails_pending_subscription() {
        let store = InMemoryStore::new();
        let pending = Subscription::pending(UserId::new(), PlanCode::Basic, "order_3".into());
        SubscriptionRepository::create(&store, &pending).await.unwrap();

        let outcome = handler(&store)
            .handle(delivery("payment.failed", "order_3"))
            .await
            .unwrap();
        assert_eq!(outcome, WebhookOutcome::SubscriptionFailed(pending.id));
    }

    #[tokio::test]
    async fn captured_payment_confirms_reservation() {
        let store = InMemoryStore::new();
        let host = verified_user(&store, "host@example.com").await;
        let guest = verified_user(&store, "guest@example.com").await;
        let listing = StayListing::create(host.id, sample_listing_input().validate().unwrap());
        StayListingRepository::create(&store, &listing).await.unwrap();
        let today = Timestamp::now().date();
        let dates = StayDates::new(today + chrono::Duration::days(5), today + chrono::Duration::days(8)).unwrap();
        let now = Timestamp::now();
        let mut reservation = Reservation::hold(&listing, guest.id, dates, 2, 30, now).unwrap();
        reservation.attach_order("order_stay".into());
        store.reserve(&reservation, now).await.unwrap();

        let outcome = handler(&store)
            .handle(delivery("order.paid", "order_stay"))
            .await
            .unwrap();
        assert_eq!(outcome, WebhookOutcome::ReservationConfirmed(reservation.id));
        let stored = ReservationRepository::find_by_id(&store, &reservation.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Confirmed);
    }

    #[tokio::test]
    async fn unsigned_delivery_is_rejected() {
        let store = InMemoryStore::new();
        let mut cmd = delivery("payment.captured", "order_1");
        cmd.signature = "nope".into();
        let err = handler(&store).handle(cmd).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentVerificationFailed);
    }

    #[tokio::test]
    async fn unrelated_events_are_ignored() {
        let store = InMemoryStore::new();
        let outcome = handler(&store)
            .handle(delivery("refund.created", "order_1"))
            .await
            .unwrap();
        assert_eq!(outcome, WebhookOutcome::Ignored);
    }
}
