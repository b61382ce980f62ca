use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, LeadId, Page, PageRequest, Timestamp, UserId};
use crate::domain::marketing::Lead;
use crate::domain::subscription::{Subscription, SubscriptionStatus};
use crate::ports::{LeadFilter, LeadRepository, SubscriptionRepository};

use super::{paginate, InMemoryStore};

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn create(&self, subscription: &Subscription) -> Result<(), DomainError> {
        self.tables()
            .subscriptions
            .insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut t = self.tables();
        match t.subscriptions.get_mut(&subscription.id) {
            Some(existing) => {
                *existing = subscription.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(
                ErrorCode::SubscriptionNotFound,
                "Subscription",
                subscription.id,
            )),
        }
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .tables()
            .subscriptions
            .values()
            .find(|s| s.gateway_order_id.as_deref() == Some(order_id))
            .cloned())
    }

    async fn find_current(&self, user: &UserId, now: Timestamp) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .tables()
            .subscriptions
            .values()
            .filter(|s| &s.user_id == user && s.is_current(now))
            .max_by_key(|s| s.starts_at)
            .cloned())
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Subscription>, DomainError> {
        let t = self.tables();
        let mut found: Vec<Subscription> = t
            .subscriptions
            .values()
            .filter(|s| &s.user_id == user)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn activate_superseding(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut t = self.tables();
        let now = Timestamp::now();
        for other in t.subscriptions.values_mut() {
            if other.user_id == subscription.user_id
                && other.id != subscription.id
                && other.status.has_access()
            {
                other.status = SubscriptionStatus::Expired;
                other.updated_at = now;
            }
        }
        t.subscriptions.insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn expire_lapsed(&self, now: Timestamp) -> Result<u64, DomainError> {
        let mut t = self.tables();
        let mut expired = 0;
        for s in t.subscriptions.values_mut() {
            let lapsed = s.ends_at.map(|end| !end.is_after(&now)).unwrap_or(false);
            if s.status.has_access() && lapsed {
                s.status = SubscriptionStatus::Expired;
                s.updated_at = now;
                expired += 1;
            }
        }
        Ok(expired)
    }
}

#[async_trait]
impl LeadRepository for InMemoryStore {
    async fn create(&self, lead: &Lead) -> Result<(), DomainError> {
        self.tables().leads.insert(lead.id, lead.clone());
        Ok(())
    }

    async fn update(&self, lead: &Lead) -> Result<(), DomainError> {
        let mut t = self.tables();
        match t.leads.get_mut(&lead.id) {
            Some(existing) => {
                *existing = lead.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(ErrorCode::LeadNotFound, "Lead", lead.id)),
        }
    }

    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, DomainError> {
        Ok(self.tables().leads.get(id).cloned())
    }

    async fn list(&self, filter: &LeadFilter, page: PageRequest) -> Result<Page<Lead>, DomainError> {
        let t = self.tables();
        let mut found: Vec<Lead> = t
            .leads
            .values()
            .filter(|l| filter.status.map(|s| l.status == s).unwrap_or(true))
            .filter(|l| filter.source.map(|s| l.source == s).unwrap_or(true))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(found, page))
    }

    async fn subscribe(&self, email: &str) -> Result<bool, DomainError> {
        let previous = self.tables().newsletter.insert(email.to_string(), true);
        Ok(previous != Some(true))
    }

    async fn unsubscribe(&self, email: &str) -> Result<bool, DomainError> {
        let mut t = self.tables();
        match t.newsletter.get_mut(email) {
            Some(subscribed) if *subscribed => {
                *subscribed = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
