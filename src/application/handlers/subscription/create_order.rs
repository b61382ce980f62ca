//! CreateSubscriptionOrderHandler - Starts checkout for a paid plan.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::subscription::{PlanCode, Subscription};
use crate::ports::{GatewayOrder, PaymentGateway, SubscriptionRepository};

#[derive(Debug, Clone)]
pub struct CreateSubscriptionOrderCommand {
    pub user_id: UserId,
    pub plan: PlanCode,
}

/// What the client needs to open the checkout widget.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionOrder {
    pub order: GatewayOrder,
    pub subscription: Subscription,
}

pub struct CreateSubscriptionOrderHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    gateway: Arc<dyn PaymentGateway>,
}

impl CreateSubscriptionOrderHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            subscriptions,
            gateway,
        }
    }

    pub async fn handle(&self, cmd: CreateSubscriptionOrderCommand) -> Result<SubscriptionOrder, DomainError> {
        if !cmd.plan.is_paid() {
            return Err(DomainError::validation("plan", "The free plan needs no payment"));
        }
        let plan = cmd.plan.plan();

        // Gateway receipts are capped at 40 characters.
        let receipt = format!("sub_{}", cmd.user_id.as_uuid().simple());
        let order = self.gateway.create_order(plan.price_paise()?, &receipt).await?;

        let subscription = Subscription::pending(cmd.user_id, cmd.plan, order.order_id.clone());
        self.subscriptions.create(&subscription).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            plan = %cmd.plan,
            order_id = %order.order_id,
            "Subscription order created"
        );
        Ok(SubscriptionOrder { order, subscription })
    }
}
