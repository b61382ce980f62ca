//! RequestVisitHandler - Books a site visit to an active listing.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::Notifier;
use crate::domain::booking::{Booking, VisitRequest};
use crate::domain::foundation::{DomainError, ErrorCode, PropertyId, Timestamp, UserId};
use crate::domain::notification::{self, VisitSummary};
use crate::ports::{BookingRepository, PropertyRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct RequestVisitCommand {
    pub visitor_id: UserId,
    pub property_id: PropertyId,
    pub visit_date: NaiveDate,
    pub time_slot: String,
    pub contact_phone: String,
    pub message: Option<String>,
}

pub struct RequestVisitHandler {
    bookings: Arc<dyn BookingRepository>,
    properties: Arc<dyn PropertyRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Notifier,
}

impl RequestVisitHandler {
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

    pub async fn handle(&self, cmd: RequestVisitCommand) -> Result<Booking, DomainError> {
        let request = VisitRequest::new(
            cmd.visit_date,
            &cmd.time_slot,
            &cmd.contact_phone,
            cmd.message.as_deref(),
            Timestamp::now().date(),
        )?;

        // 1. Only active listings take visits
        let property = self
            .properties
            .find_by_id(&cmd.property_id)
            .await?
            .filter(|p| p.is_public())
            .ok_or_else(|| {
                DomainError::not_found(ErrorCode::PropertyNotFound, "Property", cmd.property_id)
            })?;

        // 2. One open visit per visitor and listing
        if self.bookings.has_open_booking(&cmd.visitor_id, &property.id).await? {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "You already have an open visit request for this property",
            ));
        }

        let booking = Booking::request(property.id, property.owner_id, cmd.visitor_id, request)?;
        self.bookings.create(&booking).await?;

        // 3. Tell the owner
        let owner = self.users.find_by_id(&property.owner_id).await?;
        let visitor = self.users.find_by_id(&cmd.visitor_id).await?;
        if let (Some(owner), Some(visitor)) = (owner, visitor) {
            self.notifier.dispatch(notification::booking_received(
                self.notifier.branding(),
                &owner.email,
                &owner.name,
                &visitor.name,
                &booking.contact_phone,
                &VisitSummary {
                    property_title: &property.details.title,
                    visit_date: booking.visit_date,
                    time_slot: booking.time_slot.as_str(),
                },
            ));
        }

        tracing::info!(booking_id = %booking.id, property_id = %property.id, "Visit requested");
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{active_property, verified_user};
    use crate::application::notifier::tests::{recording_notifier, settle};
    use crate::domain::booking::BookingStatus;

    fn command(visitor: UserId, property: PropertyId) -> RequestVisitCommand {
        RequestVisitCommand {
            visitor_id: visitor,
            property_id: property,
            visit_date: Timestamp::now().add_days(3).date(),
            time_slot: "morning".into(),
            contact_phone: "9876543210".into(),
            message: None,
        }
    }

    #[tokio::test]
    async fn visit_is_booked_and_owner_emailed() {
        let store = InMemoryStore::new();
        let owner = verified_user(&store, "owner@example.com").await;
        let visitor = verified_user(&store, "visitor@example.com").await;
        let property = active_property(&store, &owner).await;
        let (notifier, sender) = recording_notifier();
        let shared = Arc::new(store.clone());
        let handler = RequestVisitHandler::new(shared.clone(), shared.clone(), shared, notifier);

        let booking = handler.handle(command(visitor.id, property.id)).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.owner_id, owner.id);

        settle().await;
        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, owner.email);
    }

    #[tokio::test]
    async fn second_open_request_conflicts() {
        let store = InMemoryStore::new();
        let owner = verified_user(&store, "owner@example.com").await;
        let visitor = verified_user(&store, "visitor@example.com").await;
        let property = active_property(&store, &owner).await;
        let (notifier, _) = recording_notifier();
        let shared = Arc::new(store.clone());
        let handler = RequestVisitHandler::new(shared.clone(), shared.clone(), shared, notifier);

        handler.handle(command(visitor.id, property.id)).await.unwrap();
        let err = handler.handle(command(visitor.id, property.id)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn inactive_listing_cannot_be_visited() {
        let store = InMemoryStore::new();
        let owner = verified_user(&store, "owner@example.com").await;
        let visitor = verified_user(&store, "visitor@example.com").await;
        let mut property = active_property(&store, &owner).await;
        property.archive().unwrap();
        PropertyRepository::update(&store, &property).await.unwrap();
        let (notifier, _) = recording_notifier();
        let shared = Arc::new(store.clone());

        let err = RequestVisitHandler::new(shared.clone(), shared.clone(), shared, notifier)
            .handle(command(visitor.id, property.id))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PropertyNotFound);
    }
}
