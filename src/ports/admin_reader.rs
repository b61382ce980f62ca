//! Read-only aggregates for the admin dashboard.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{DomainError, Timestamp};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub users: i64,
    pub users_verified: i64,
    pub properties_total: i64,
    pub properties_pending: i64,
    pub properties_active: i64,
    pub bookings_pending: i64,
    pub live_projects: i64,
    pub units_booked: i64,
    pub reservations_confirmed: i64,
    pub active_subscriptions: i64,
    pub new_leads: i64,
}

#[async_trait]
pub trait AdminReader: Send + Sync {
    async fn dashboard_stats(&self, now: Timestamp) -> Result<DashboardStats, DomainError>;
}
