//! Subscription aggregate.
//!
//! # Design Decisions
//!
//! - **Rupees in storage**: `amount` is whole rupees; the gateway sees paise
//! - **Activation starts now**: a paid plan runs from the moment payment is
//!   verified and replaces any other current subscription
//! - **Free is implicit**: users without a current subscription are on `free`

use serde::Serialize;

use crate::domain::foundation::{
    DomainError, StateMachine, SubscriptionId, Timestamp, UserId,
};

use super::{PlanCode, SubscriptionStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub plan: PlanCode,
    pub status: SubscriptionStatus,
    pub amount: i64,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub cancelled_at: Option<Timestamp>,
}

impl Subscription {
    /// Pending subscription tied to a gateway order.
    pub fn pending(user_id: UserId, plan: PlanCode, order_id: String) -> Self {
        let now = Timestamp::now();
        Self {
            id: SubscriptionId::new(),
            user_id,
            plan,
            status: SubscriptionStatus::Pending,
            amount: plan.plan().price,
            gateway_order_id: Some(order_id),
            gateway_payment_id: None,
            starts_at: None,
            ends_at: None,
            created_at: now,
            updated_at: now,
            cancelled_at: None,
        }
    }

    /// Activates after a verified payment. The period starts at `now`.
    pub fn activate(&mut self, payment_id: String, now: Timestamp) -> Result<(), DomainError> {
        self.status = self.status.transition_to(SubscriptionStatus::Active)?;
        self.gateway_payment_id = Some(payment_id);
        self.starts_at = Some(now);
        self.ends_at = self.plan.plan().duration_days.map(|days| now.add_days(days));
        self.updated_at = now;
        Ok(())
    }

    pub fn fail(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(SubscriptionStatus::Failed)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(SubscriptionStatus::Cancelled)?;
        let now = Timestamp::now();
        self.cancelled_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    pub fn expire(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(SubscriptionStatus::Expired)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// True while the subscription grants its plan's benefits.
    pub fn is_current(&self, now: Timestamp) -> bool {
        self.status.has_access() && self.ends_at.map(|end| end.is_after(&now)).unwrap_or(true)
    }
}

/// Plan the user is entitled to right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entitlement {
    pub plan: PlanCode,
    pub listing_limit: i64,
    pub subscription: Option<Subscription>,
}

impl Entitlement {
    /// Falls back to the free plan when no current subscription exists.
    pub fn resolve(current: Option<Subscription>, now: Timestamp) -> Self {
        match current.filter(|s| s.is_current(now)) {
            Some(sub) => Self {
                plan: sub.plan,
                listing_limit: sub.plan.plan().listing_limit,
                subscription: Some(sub),
            },
            None => Self {
                plan: PlanCode::Free,
                listing_limit: PlanCode::Free.plan().listing_limit,
                subscription: None,
            },
        }
    }

    pub fn allows_another_listing(&self, current_listings: i64) -> bool {
        current_listings < self.listing_limit
    }
}
