//! Subscription and payment handlers.
//!
//! ## Commands
//! - `CreateSubscriptionOrderHandler` - Gateway order plus pending subscription
//! - `VerifySubscriptionPaymentHandler` - Checkout callback signature check
//! - `CancelSubscriptionHandler` - Stops renewal; access lasts until the period ends
//! - `HandlePaymentWebhookHandler` - Settles subscription and stay orders
//!
//! ## Queries
//! - `GetEntitlementHandler` - Current plan, falling back to free

mod cancel_subscription;
mod create_order;
mod get_entitlement;
mod handle_webhook;
mod verify_payment;

pub use cancel_subscription::{CancelSubscriptionCommand, CancelSubscriptionHandler};
pub use create_order::{
    CreateSubscriptionOrderCommand, CreateSubscriptionOrderHandler, SubscriptionOrder,
};
pub use get_entitlement::{GetEntitlementHandler, GetEntitlementQuery};
pub use handle_webhook::{HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, WebhookOutcome};
pub use verify_payment::{VerifySubscriptionPaymentCommand, VerifySubscriptionPaymentHandler};

use std::sync::Arc;

use crate::application::Notifier;
use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::notification;
use crate::domain::subscription::Subscription;
use crate::ports::{SubscriptionRepository, UserRepository};

/// Activates a paid subscription and emails the subscriber.
///
/// Already-active subscriptions with the same payment are returned unchanged.
pub(crate) async fn activate_paid(
    subscriptions: &Arc<dyn SubscriptionRepository>,
    users: &Arc<dyn UserRepository>,
    notifier: &Notifier,
    mut subscription: Subscription,
    payment_id: String,
) -> Result<Subscription, DomainError> {
    if subscription.gateway_payment_id.as_deref() == Some(payment_id.as_str())
        && subscription.status.has_access()
    {
        return Ok(subscription);
    }

    subscription.activate(payment_id, Timestamp::now())?;
    subscriptions.activate_superseding(&subscription).await?;

    if let Some(user) = users.find_by_id(&subscription.user_id).await? {
        let plan = subscription.plan.plan();
        notifier.dispatch(notification::subscription_activated(
            notifier.branding(),
            &user.email,
            &user.name,
            plan.name,
            subscription.amount,
            subscription.ends_at.map(|t| t.date()),
        ));
    }

    tracing::info!(
        subscription_id = %subscription.id,
        user_id = %subscription.user_id,
        plan = %subscription.plan,
        "Subscription activated"
    );
    Ok(subscription)
}
