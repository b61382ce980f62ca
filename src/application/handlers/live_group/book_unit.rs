//! BookUnitHandler - Books a held unit at the group price.

use std::sync::Arc;

use crate::application::Notifier;
use crate::domain::foundation::{DomainError, Timestamp, UnitId, UserId};
use crate::domain::live_group::LiveBooking;
use crate::domain::notification;
use crate::ports::{ProjectRepository, UnitHoldRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct BookUnitCommand {
    pub user_id: UserId,
    pub unit_id: UnitId,
    pub payment_reference: Option<String>,
}

pub struct BookUnitHandler {
    units: Arc<dyn UnitHoldRepository>,
    projects: Arc<dyn ProjectRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Notifier,
}

impl BookUnitHandler {
    pub fn new(
        units: Arc<dyn UnitHoldRepository>,
        projects: Arc<dyn ProjectRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Notifier,
    ) -> Self {
        Self {
            units,
            projects,
            users,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: BookUnitCommand) -> Result<LiveBooking, DomainError> {
        // 1. Hold check, unit transition and booking row are one atomic step
        let reference = cmd
            .payment_reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        let booking = self
            .units
            .book_unit(&cmd.unit_id, cmd.user_id, reference, Timestamp::now())
            .await?;

        tracing::info!(
            booking_id = %booking.id,
            unit_id = ?booking.unit_id,
            amount = booking.amount,
            "Live-group unit booked"
        );

        // 2. Confirmation email
        self.send_confirmation(&booking).await;
        Ok(booking)
    }

    async fn send_confirmation(&self, booking: &LiveBooking) {
        let lookup = async {
            let user = self.users.find_by_id(&booking.user_id).await?;
            let project = self.projects.find_by_id(&booking.project_id).await?;
            let unit = match booking.unit_id {
                Some(id) => self.units.find_unit(&id).await?,
                None => None,
            };
            Ok::<_, DomainError>((user, project, unit))
        };
        match lookup.await {
            Ok((Some(user), Some(project), Some(unit))) => {
                self.notifier.dispatch(notification::live_group_unit_booked(
                    self.notifier.branding(),
                    &user.email,
                    &user.name,
                    &project.details.name,
                    &unit.unit_number,
                    booking.amount,
                ));
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(booking_id = %booking.id, error = %e, "Booking email skipped"),
        }
    }
}
