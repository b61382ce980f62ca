//! In-memory implementations of the repository ports.
//!
//! A single [`InMemoryStore`] owns every table so that cross-aggregate
//! operations (account deletion, admin counters, wishlist joins) behave like
//! their PostgreSQL counterparts. Used by tests and by local runs without a
//! database.
//!
//! The lock is a `std::sync::Mutex` and is never held across an `.await`.

mod accounts;
mod chat;
mod commerce;
mod listings;
mod live_group;
mod short_stay;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::booking::Booking;
use crate::domain::chat::{ChatMessage, Conversation};
use crate::domain::foundation::{
    BookingId, ConversationId, LeadId, ListingId, LiveBookingId, Page, PageRequest, ProjectId,
    PropertyId, ReservationId, ReviewId, SubscriptionId, Timestamp, TowerId, UnitId, UserId,
};
use crate::domain::live_group::{LiveBooking, Project, Tower, Unit};
use crate::domain::marketing::Lead;
use crate::domain::property::Property;
use crate::domain::review::Review;
use crate::domain::short_stay::{Reservation, StayListing};
use crate::domain::subscription::Subscription;
use crate::domain::user::{OtpPurpose, OtpRecord, User};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    otps: HashMap<(String, OtpPurpose), OtpRecord>,
    properties: HashMap<PropertyId, Property>,
    bookings: HashMap<BookingId, Booking>,
    projects: HashMap<ProjectId, Project>,
    towers: HashMap<TowerId, Tower>,
    units: HashMap<UnitId, Unit>,
    live_bookings: HashMap<LiveBookingId, LiveBooking>,
    stay_listings: HashMap<ListingId, StayListing>,
    reservations: HashMap<ReservationId, Reservation>,
    subscriptions: HashMap<SubscriptionId, Subscription>,
    /// (user, property, saved_at)
    wishlists: Vec<(UserId, PropertyId, Timestamp)>,
    reviews: HashMap<ReviewId, Review>,
    conversations: HashMap<ConversationId, Conversation>,
    messages: Vec<ChatMessage>,
    leads: HashMap<LeadId, Lead>,
    /// email → subscribed
    newsletter: HashMap<String, bool>,
}

impl Tables {
    /// Removes a property and every row that references it.
    fn remove_property(&mut self, id: &PropertyId) -> bool {
        let existed = self.properties.remove(id).is_some();
        self.wishlists.retain(|(_, p, _)| p != id);
        self.reviews.retain(|_, r| &r.property_id != id);
        self.bookings.retain(|_, b| &b.property_id != id);
        let dropped: Vec<ConversationId> = self
            .conversations
            .values()
            .filter(|c| &c.property_id == id)
            .map(|c| c.id)
            .collect();
        self.conversations.retain(|_, c| &c.property_id != id);
        self.messages.retain(|m| !dropped.contains(&m.conversation_id));
        for lead in self.leads.values_mut() {
            if lead.property_id.as_ref() == Some(id) {
                lead.property_id = None;
            }
        }
        existed
    }
}

/// Shared in-memory database.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Slices an already ordered result set into a page.
fn paginate<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    Page::new(items, total, page)
}

/// Case-insensitive substring match used in place of `ILIKE`.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
