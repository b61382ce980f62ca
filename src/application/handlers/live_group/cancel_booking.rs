//! CancelLiveBookingHandler - Admin cancels a confirmed unit booking.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, LiveBookingId, Timestamp};
use crate::domain::live_group::LiveBooking;
use crate::ports::UnitHoldRepository;

#[derive(Debug, Clone)]
pub struct CancelLiveBookingCommand {
    pub actor: AuthenticatedUser,
    pub booking_id: LiveBookingId,
}

pub struct CancelLiveBookingHandler {
    units: Arc<dyn UnitHoldRepository>,
}

impl CancelLiveBookingHandler {
    pub fn new(units: Arc<dyn UnitHoldRepository>) -> Self {
        Self { units }
    }

    /// The unit returns to sale in the same step.
    pub async fn handle(&self, cmd: CancelLiveBookingCommand) -> Result<LiveBooking, DomainError> {
        cmd.actor.require_admin()?;
        let booking = self.units.cancel_booking(&cmd.booking_id, Timestamp::now()).await?;
        tracing::info!(
            booking_id = %booking.id,
            unit_id = ?booking.unit_id,
            admin_id = %cmd.actor.id,
            "Live-group booking cancelled"
        );
        Ok(booking)
    }
}
