//! VerifySubscriptionPaymentHandler - Activates a plan after checkout.

use std::sync::Arc;

use crate::application::Notifier;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::subscription::Subscription;
use crate::ports::{PaymentGateway, SubscriptionRepository, UserRepository};

use super::activate_paid;

#[derive(Debug, Clone)]
pub struct VerifySubscriptionPaymentCommand {
    pub user_id: UserId,
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

pub struct VerifySubscriptionPaymentHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    users: Arc<dyn UserRepository>,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Notifier,
}

impl VerifySubscriptionPaymentHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        users: Arc<dyn UserRepository>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Notifier,
    ) -> Self {
        Self {
            subscriptions,
            users,
            gateway,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: VerifySubscriptionPaymentCommand) -> Result<Subscription, DomainError> {
        // 1. Signature first; nothing is read for forged callbacks
        self.gateway
            .verify_payment(&cmd.order_id, &cmd.payment_id, &cmd.signature)?;

        // 2. The order must be the caller's
        let subscription = self
            .subscriptions
            .find_by_order_id(&cmd.order_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(ErrorCode::SubscriptionNotFound, "Subscription", &cmd.order_id)
            })?;
        if subscription.user_id != cmd.user_id {
            return Err(DomainError::forbidden("This order belongs to another account"));
        }

        // 3. Activate (idempotent for the same payment)
        activate_paid(
            &self.subscriptions,
            &self.users,
            &self.notifier,
            subscription,
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
    use crate::application::handlers::test_support::verified_user;
    use crate::application::notifier::tests::{recording_notifier, settle};
    use crate::domain::foundation::Timestamp;
    use crate::domain::subscription::{PlanCode, SubscriptionStatus};

    async fn setup() -> (InMemoryStore, UserId, VerifySubscriptionPaymentHandler, Arc<crate::adapters::email::RecordingEmailSender>) {
        let store = InMemoryStore::new();
        let user = verified_user(&store, "asha@example.com").await;
        let pending = Subscription::pending(user.id, PlanCode::Premium, "order_1".into());
        SubscriptionRepository::create(&store, &pending).await.unwrap();
        let (notifier, sender) = recording_notifier();
        let shared = Arc::new(store.clone());
        let handler = VerifySubscriptionPaymentHandler::new(
            shared.clone(),
            shared,
            Arc::new(MockPaymentGateway::new()),
            notifier,
        );
        (store, user.id, handler, sender)
    }

    fn command(user: UserId, signature: &str) -> VerifySubscriptionPaymentCommand {
        VerifySubscriptionPaymentCommand {
            user_id: user,
            order_id: "order_1".into(),
            payment_id: "pay_1".into(),
            signature: signature.into(),
        }
    }

    #[tokio::test]
    async fn valid_signature_activates_and_emails() {
        let (store, user, handler, sender) = setup().await;

        let sub = handler
            .handle(command(user, MockPaymentGateway::SIGNATURE))
            .await
            .unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert!(sub.ends_at.is_some());

        let current = store.find_current(&user, Timestamp::now()).await.unwrap().unwrap();
        assert_eq!(current.plan, PlanCode::Premium);
        settle().await;
        assert_eq!(sender.sent().len(), 1);
    }

    #[tokio::test]
    async fn repeated_verification_is_idempotent() {
        let (_, user, handler, sender) = setup().await;
        handler.handle(command(user, MockPaymentGateway::SIGNATURE)).await.unwrap();
        handler.handle(command(user, MockPaymentGateway::SIGNATURE)).await.unwrap();
        settle().await;
        assert_eq!(sender.sent().len(), 1);
    }

    #[tokio::test]
    async fn bad_signature_fails_verification() {
        let (_, user, handler, _) = setup().await;
        let err = handler.handle(command(user, "forged")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentVerificationFailed);
    }

    #[tokio::test]
    async fn other_users_order_is_forbidden() {
        let (_, _, handler, _) = setup().await;
        let err = handler
            .handle(command(UserId::new(), MockPaymentGateway::SIGNATURE))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
