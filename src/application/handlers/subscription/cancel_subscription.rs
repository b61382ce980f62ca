//! CancelSubscriptionHandler - Cancels the current paid plan.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::subscription::{Subscription, SubscriptionStatus};
use crate::ports::SubscriptionRepository;

#[derive(Debug, Clone)]
pub struct CancelSubscriptionCommand {
    pub user_id: UserId,
}

pub struct CancelSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl CancelSubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    /// The plan keeps its benefits until `ends_at`.
    pub async fn handle(&self, cmd: CancelSubscriptionCommand) -> Result<Subscription, DomainError> {
        let mut subscription = self
            .subscriptions
            .find_current(&cmd.user_id, Timestamp::now())
            .await?
            .filter(|s| s.status == SubscriptionStatus::Active)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::InvalidStateTransition,
                    "You have no active subscription to cancel",
                )
            })?;

        subscription.cancel()?;
        self.subscriptions.update(&subscription).await?;

        tracing::info!(subscription_id = %subscription.id, user_id = %cmd.user_id, "Subscription cancelled");
        Ok(subscription)
    }
}
