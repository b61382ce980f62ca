//! GetEntitlementHandler - Resolves the caller's plan.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::subscription::Entitlement;
use crate::ports::SubscriptionRepository;

#[derive(Debug, Clone)]
pub struct GetEntitlementQuery {
    pub user_id: UserId,
}

pub struct GetEntitlementHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl GetEntitlementHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    pub async fn handle(&self, query: GetEntitlementQuery) -> Result<Entitlement, DomainError> {
        let now = Timestamp::now();
        let current = self.subscriptions.find_current(&query.user_id, now).await?;
        Ok(Entitlement::resolve(current, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::subscription::PlanCode;

    #[tokio::test]
    async fn users_without_subscription_are_on_free() {
        let handler = GetEntitlementHandler::new(Arc::new(InMemoryStore::new()));
        let entitlement = handler
            .handle(GetEntitlementQuery { user_id: UserId::new() })
            .await
            .unwrap();
        assert_eq!(entitlement.plan, PlanCode::Free);
        assert_eq!(entitlement.listing_limit, 2);
    }
}
