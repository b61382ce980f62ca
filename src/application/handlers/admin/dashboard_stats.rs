//! DashboardStatsHandler - Headline counts for the admin console.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, Timestamp};
use crate::ports::{AdminReader, DashboardStats};

pub struct DashboardStatsHandler {
    reader: Arc<dyn AdminReader>,
}

impl DashboardStatsHandler {
    pub fn new(reader: Arc<dyn AdminReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, actor: &AuthenticatedUser) -> Result<DashboardStats, DomainError> {
        actor.require_admin()?;
        self.reader.dashboard_stats(Timestamp::now()).await
    }
}
