//! UpdateBookingStatusHandler - Moves a visit through its lifecycle.

use std::sync::Arc;

use crate::application::Notifier;
use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::foundation::{BookingId, DomainError, ErrorCode, UserId};
use crate::domain::notification::{self, VisitSummary};
use crate::ports::{BookingRepository, PropertyRepository, UserRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Confirm,
    Reject,
    Complete,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct UpdateBookingStatusCommand {
    pub actor_id: UserId,
    pub booking_id: BookingId,
    pub action: BookingAction,
}

pub struct UpdateBookingStatusHandler {
    bookings: Arc<dyn BookingRepository>,
    properties: Arc<dyn PropertyRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Notifier,
}

impl UpdateBookingStatusHandler {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        properties: Arc<dyn PropertyRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Notifier,
    ) -> Self {
        Self {
            bookings,
            properties,
            users,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: UpdateBookingStatusCommand) -> Result<Booking, DomainError> {
        let mut booking = self
            .bookings
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::BookingNotFound, "Booking", cmd.booking_id))?;

        match cmd.action {
            BookingAction::Confirm => booking.owner_decide(&cmd.actor_id, BookingStatus::Confirmed)?,
            BookingAction::Reject => booking.owner_decide(&cmd.actor_id, BookingStatus::Rejected)?,
            BookingAction::Complete => booking.owner_decide(&cmd.actor_id, BookingStatus::Completed)?,
            BookingAction::Cancel => booking.cancel(&cmd.actor_id)?,
        }
        self.bookings.update(&booking).await?;

        if let Err(e) = self.notify_visitor(&booking).await {
            tracing::warn!(booking_id = %booking.id, error = %e, "Visit update email skipped");
        }

        tracing::info!(booking_id = %booking.id, status = %booking.status, "Visit status changed");
        Ok(booking)
    }

    async fn notify_visitor(&self, booking: &Booking) -> Result<(), DomainError> {
        let Some(visitor) = self.users.find_by_id(&booking.visitor_id).await? else {
            return Ok(());
        };
        let title = self
            .properties
            .find_by_id(&booking.property_id)
            .await?
            .map(|p| p.details.title)
            .unwrap_or_default();
        self.notifier.dispatch(notification::booking_status(
            self.notifier.branding(),
            &visitor.email,
            &visitor.name,
            booking.status.as_str(),
            &VisitSummary {
                property_title: &title,
                visit_date: booking.visit_date,
                time_slot: booking.time_slot.as_str(),
            },
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{active_property, verified_user};
    use crate::application::notifier::tests::{recording_notifier, settle};
    use crate::domain::booking::VisitRequest;
    use crate::domain::foundation::Timestamp;
    use crate::domain::user::User;

    struct Fixture {
        store: InMemoryStore,
        owner: User,
        visitor: User,
        booking: Booking,
    }

    async fn fixture() -> Fixture {
        let store = InMemoryStore::new();
        let owner = verified_user(&store, "owner@example.com").await;
        let visitor = verified_user(&store, "visitor@example.com").await;
        let property = active_property(&store, &owner).await;
        let today = Timestamp::now().date();
        let request = VisitRequest::new(today, "evening", "9876543210", None, today).unwrap();
        let booking = Booking::request(property.id, owner.id, visitor.id, request).unwrap();
        BookingRepository::create(&store, &booking).await.unwrap();
        Fixture {
            store,
            owner,
            visitor,
            booking,
        }
    }

    fn handler(store: &InMemoryStore) -> (UpdateBookingStatusHandler, Arc<crate::adapters::email::RecordingEmailSender>) {
        let (notifier, sender) = recording_notifier();
        let shared = Arc::new(store.clone());
        (
            UpdateBookingStatusHandler::new(shared.clone(), shared.clone(), shared, notifier),
            sender,
        )
    }

    #[tokio::test]
    async fn owner_confirmation_emails_visitor() {
        let f = fixture().await;
        let (handler, sender) = handler(&f.store);

        let booking = handler
            .handle(UpdateBookingStatusCommand {
                actor_id: f.owner.id,
                booking_id: f.booking.id,
                action: BookingAction::Confirm,
            })
            .await
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);

        settle().await;
        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, f.visitor.email);
    }

    #[tokio::test]
    async fn visitor_may_cancel_but_not_confirm() {
        let f = fixture().await;
        let (handler, _) = handler(&f.store);

        let err = handler
            .handle(UpdateBookingStatusCommand {
                actor_id: f.visitor.id,
                booking_id: f.booking.id,
                action: BookingAction::Confirm,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let cancelled = handler
            .handle(UpdateBookingStatusCommand {
                actor_id: f.visitor.id,
                booking_id: f.booking.id,
                action: BookingAction::Cancel,
            })
            .await
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
    }
}
