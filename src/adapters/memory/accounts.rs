use async_trait::async_trait;

use crate::domain::booking::BookingStatus;
use crate::domain::foundation::{
    DomainError, ErrorCode, Page, PageRequest, Timestamp, UserId,
};
use crate::domain::live_group::{LiveBookingStatus, ProjectStatus, UnitStatus};
use crate::domain::marketing::LeadStatus;
use crate::domain::property::PropertyStatus;
use crate::domain::short_stay::ReservationStatus;
use crate::domain::user::{OtpPurpose, OtpRecord, User};
use crate::ports::{AdminReader, DashboardStats, OtpRepository, UserFilter, UserRepository};

use super::{contains_ci, paginate, InMemoryStore};

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        let mut t = self.tables();
        if t.users.values().any(|u| u.email == user.email) {
            return Err(DomainError::new(ErrorCode::EmailTaken, "Email is already registered"));
        }
        t.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut t = self.tables();
        match t.users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(ErrorCode::UserNotFound, "User", user.id)),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.tables().users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = email.trim().to_lowercase();
        Ok(self.tables().users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> Result<Page<User>, DomainError> {
        let t = self.tables();
        let mut users: Vec<User> = t
            .users
            .values()
            .filter(|u| filter.role.map(|r| u.role == r).unwrap_or(true))
            .filter(|u| match &filter.q {
                Some(q) => contains_ci(&u.name, q) || contains_ci(&u.email, q),
                None => true,
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(users, page))
    }

    async fn delete_cascade(&self, id: &UserId) -> Result<(), DomainError> {
        let mut t = self.tables();
        let user = t
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(ErrorCode::UserNotFound, "User", id))?;

        let booked: Vec<_> = t
            .live_bookings
            .values()
            .filter(|b| &b.user_id == id && b.status == LiveBookingStatus::Confirmed)
            .filter_map(|b| b.unit_id)
            .collect();
        for unit_id in &booked {
            if let Some(unit) = t.units.get_mut(unit_id) {
                if unit.status == UnitStatus::Booked {
                    unit.unbook();
                }
            }
        }

        t.wishlists.retain(|(u, _, _)| u != id);
        t.reviews.retain(|_, r| &r.author_id != id);
        let dropped: Vec<_> = t
            .conversations
            .values()
            .filter(|c| c.is_participant(id))
            .map(|c| c.id)
            .collect();
        t.conversations.retain(|_, c| !c.is_participant(id));
        t.messages.retain(|m| !dropped.contains(&m.conversation_id) && &m.sender_id != id);
        t.bookings.retain(|_, b| !b.is_participant(id));
        t.reservations.retain(|_, r| !r.is_participant(id));
        for unit in t.units.values_mut() {
            if unit.locked_by.as_ref() == Some(id) {
                unit.clear_lock();
            }
        }
        t.live_bookings.retain(|_, b| &b.user_id != id);
        for lead in t.leads.values_mut() {
            if lead.user_id.as_ref() == Some(id) {
                lead.user_id = None;
            }
        }
        t.subscriptions.retain(|_, s| &s.user_id != id);
        t.otps.retain(|(email, _), _| email != &user.email);

        let owned: Vec<_> = t
            .properties
            .values()
            .filter(|p| &p.owner_id == id)
            .map(|p| p.id)
            .collect();
        for property in owned {
            t.remove_property(&property);
        }
        let hosted: Vec<_> = t
            .stay_listings
            .values()
            .filter(|l| &l.host_id == id)
            .map(|l| l.id)
            .collect();
        t.reservations.retain(|_, r| !hosted.contains(&r.listing_id));
        t.stay_listings.retain(|_, l| &l.host_id != id);

        t.users.remove(id);
        Ok(())
    }
}

#[async_trait]
impl OtpRepository for InMemoryStore {
    async fn save(&self, record: &OtpRecord) -> Result<(), DomainError> {
        self.tables()
            .otps
            .insert((record.email.clone(), record.purpose), record.clone());
        Ok(())
    }

    async fn find(&self, email: &str, purpose: OtpPurpose) -> Result<Option<OtpRecord>, DomainError> {
        Ok(self.tables().otps.get(&(email.to_string(), purpose)).cloned())
    }
}

#[async_trait]
impl AdminReader for InMemoryStore {
    async fn dashboard_stats(&self, now: Timestamp) -> Result<DashboardStats, DomainError> {
        let t = self.tables();
        let count = |n: usize| n as i64;
        Ok(DashboardStats {
            users: count(t.users.len()),
            users_verified: count(t.users.values().filter(|u| u.email_verified).count()),
            properties_total: count(t.properties.len()),
            properties_pending: count(
                t.properties
                    .values()
                    .filter(|p| p.status == PropertyStatus::PendingReview)
                    .count(),
            ),
            properties_active: count(
                t.properties
                    .values()
                    .filter(|p| p.status == PropertyStatus::Active)
                    .count(),
            ),
            bookings_pending: count(
                t.bookings
                    .values()
                    .filter(|b| b.status == BookingStatus::Pending)
                    .count(),
            ),
            live_projects: count(
                t.projects
                    .values()
                    .filter(|p| p.status == ProjectStatus::Live)
                    .count(),
            ),
            units_booked: count(
                t.units
                    .values()
                    .filter(|u| u.status == UnitStatus::Booked)
                    .count(),
            ),
            reservations_confirmed: count(
                t.reservations
                    .values()
                    .filter(|r| r.status == ReservationStatus::Confirmed)
                    .count(),
            ),
            active_subscriptions: count(
                t.subscriptions.values().filter(|s| s.is_current(now)).count(),
            ),
            new_leads: count(t.leads.values().filter(|l| l.status == LeadStatus::New).count()),
        })
    }
}
