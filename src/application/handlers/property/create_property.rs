//! CreatePropertyHandler - Submits a new listing for review.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::property::{Property, PropertyInput};
use crate::domain::subscription::Entitlement;
use crate::ports::{PropertyRepository, SubscriptionRepository};

#[derive(Debug, Clone)]
pub struct CreatePropertyCommand {
    pub owner_id: UserId,
    pub input: PropertyInput,
}

pub struct CreatePropertyHandler {
    properties: Arc<dyn PropertyRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl CreatePropertyHandler {
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            properties,
            subscriptions,
        }
    }

    pub async fn handle(&self, cmd: CreatePropertyCommand) -> Result<Property, DomainError> {
        // 1. Validate before touching the plan
        let details = cmd.input.validate()?;

        // 2. Enforce the listing limit of the current plan
        let now = Timestamp::now();
        let current = self.subscriptions.find_current(&cmd.owner_id, now).await?;
        let entitlement = Entitlement::resolve(current, now);
        let listed = self.properties.count_counted_for_owner(&cmd.owner_id).await?;
        if !entitlement.allows_another_listing(listed) {
            return Err(DomainError::new(
                ErrorCode::ListingLimitReached,
                format!(
                    "Your {} plan allows {} listings. Upgrade to add more.",
                    entitlement.plan, entitlement.listing_limit
                ),
            )
            .with_detail("plan", entitlement.plan.as_str())
            .with_detail("limit", entitlement.listing_limit.to_string()));
        }

        // 3. Persist in review
        let property = Property::create(cmd.owner_id, details);
        self.properties.create(&property).await?;

        tracing::info!(property_id = %property.id, owner_id = %cmd.owner_id, "Listing submitted");
        Ok(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::property::{sample_input, PropertyStatus};
    use crate::domain::subscription::{PlanCode, Subscription};

    fn handler(store: &InMemoryStore) -> CreatePropertyHandler {
        let store = Arc::new(store.clone());
        CreatePropertyHandler::new(store.clone(), store)
    }

    fn command(owner: UserId) -> CreatePropertyCommand {
        CreatePropertyCommand {
            owner_id: owner,
            input: sample_input(),
        }
    }

    #[tokio::test]
    async fn new_listing_waits_for_review() {
        let store = InMemoryStore::new();
        let property = handler(&store).handle(command(UserId::new())).await.unwrap();
        assert_eq!(property.status, PropertyStatus::PendingReview);
    }

    #[tokio::test]
    async fn free_plan_stops_at_two_listings() {
        let store = InMemoryStore::new();
        let handler = handler(&store);
        let owner = UserId::new();
        handler.handle(command(owner)).await.unwrap();
        handler.handle(command(owner)).await.unwrap();

        let err = handler.handle(command(owner)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ListingLimitReached);
        assert_eq!(err.details.get("limit").map(String::as_str), Some("2"));
    }

    #[tokio::test]
    async fn paid_plan_raises_the_limit() {
        let store = InMemoryStore::new();
        let handler = handler(&store);
        let owner = UserId::new();
        let mut sub = Subscription::pending(owner, PlanCode::Basic, "order_1".into());
        sub.activate("pay_1".into(), Timestamp::now()).unwrap();
        SubscriptionRepository::activate_superseding(&store, &sub).await.unwrap();

        for _ in 0..3 {
            handler.handle(command(owner)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let store = InMemoryStore::new();
        let mut cmd = command(UserId::new());
        cmd.input.price = 0;
        let err = handler(&store).handle(cmd).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
