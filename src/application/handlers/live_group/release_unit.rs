//! ReleaseUnitHandler - Drops the caller's own hold.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp, UnitId, UserId};
use crate::domain::live_group::Unit;
use crate::ports::UnitHoldRepository;

#[derive(Debug, Clone)]
pub struct ReleaseUnitCommand {
    pub user_id: UserId,
    pub unit_id: UnitId,
}

pub struct ReleaseUnitHandler {
    units: Arc<dyn UnitHoldRepository>,
}

impl ReleaseUnitHandler {
    pub fn new(units: Arc<dyn UnitHoldRepository>) -> Self {
        Self { units }
    }

    pub async fn handle(&self, cmd: ReleaseUnitCommand) -> Result<Unit, DomainError> {
        let unit = self
            .units
            .release_unit(&cmd.unit_id, &cmd.user_id, Timestamp::now())
            .await?;
        tracing::info!(unit_id = %unit.id, user_id = %cmd.user_id, "Unit released");
        Ok(unit)
    }
}
