//! Subscription status state machine.

use crate::domain::foundation::{string_enum, StateMachine};

string_enum! {
    /// Subscription lifecycle.
    pub enum SubscriptionStatus {
        /// Gateway order created, waiting for payment.
        Pending => "pending",
        /// Paid and within its period.
        Active => "active",
        /// Payment failed or was abandoned.
        Failed => "failed",
        /// User cancelled. Access continues until the period ends.
        Cancelled => "cancelled",
        /// Period over, or superseded by a newer subscription.
        Expired => "expired",
    }
}

impl SubscriptionStatus {
    /// Statuses that still grant plan benefits (subject to `ends_at`).
    pub fn has_access(&self) -> bool {
        matches!(self, SubscriptionStatus::Active | SubscriptionStatus::Cancelled)
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, target),
            (Pending, Active)
                | (Pending, Failed)
                | (Active, Cancelled)
                | (Active, Expired)
                | (Cancelled, Expired)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Pending => vec![Active, Failed],
            Active => vec![Cancelled, Expired],
            Cancelled => vec![Expired],
            Failed | Expired => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_activate_or_fail() {
        assert_eq!(
            SubscriptionStatus::Pending.transition_to(SubscriptionStatus::Active).unwrap(),
            SubscriptionStatus::Active
        );
        assert!(SubscriptionStatus::Pending.can_transition_to(&SubscriptionStatus::Failed));
    }

    #[test]
    fn cancelled_cannot_reactivate() {
        assert!(SubscriptionStatus::Cancelled
            .transition_to(SubscriptionStatus::Active)
            .is_err());
    }

    #[test]
    fn access_statuses() {
        assert!(SubscriptionStatus::Cancelled.has_access());
        assert!(!SubscriptionStatus::Pending.has_access());
        assert!(!SubscriptionStatus::Expired.has_access());
    }

    #[test]
    fn failed_and_expired_are_terminal() {
        assert!(SubscriptionStatus::Failed.is_terminal());
        assert!(SubscriptionStatus::Expired.is_terminal());
    }
}
