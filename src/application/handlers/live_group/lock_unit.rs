//! LockUnitHandler - Places a timed hold on a unit.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp, UnitId, UserId};
use crate::domain::live_group::{LockPolicy, Unit};
use crate::ports::UnitHoldRepository;

#[derive(Debug, Clone)]
pub struct LockUnitCommand {
    pub user_id: UserId,
    pub unit_id: UnitId,
}

pub struct LockUnitHandler {
    units: Arc<dyn UnitHoldRepository>,
    policy: LockPolicy,
}

impl LockUnitHandler {
    pub fn new(units: Arc<dyn UnitHoldRepository>, policy: LockPolicy) -> Self {
        Self { units, policy }
    }

    /// Holding a unit the caller already holds refreshes the expiry.
    pub async fn handle(&self, cmd: LockUnitCommand) -> Result<Unit, DomainError> {
        let unit = self
            .units
            .lock_unit(&cmd.unit_id, cmd.user_id, self.policy, Timestamp::now())
            .await?;

        tracing::info!(
            unit_id = %unit.id,
            user_id = %cmd.user_id,
            expires_at = ?unit.lock_expires_at,
            "Unit locked"
        );
        Ok(unit)
    }
}
