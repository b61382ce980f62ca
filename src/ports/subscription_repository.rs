//! Subscription persistence port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::subscription::Subscription;

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, subscription: &Subscription) -> Result<(), DomainError>;

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError>;

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Subscription>, DomainError>;

    /// The user's subscription that still grants access at `now`, if any.
    async fn find_current(&self, user: &UserId, now: Timestamp) -> Result<Option<Subscription>, DomainError>;

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Subscription>, DomainError>;

    /// Persists an activated subscription and expires the user's other current ones.
    async fn activate_superseding(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Marks active or cancelled subscriptions past `ends_at` as expired.
    async fn expire_lapsed(&self, now: Timestamp) -> Result<u64, DomainError>;
}
