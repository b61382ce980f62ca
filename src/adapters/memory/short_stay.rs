use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::{
    DomainError, ErrorCode, ListingId, Page, PageRequest, ReservationId, Timestamp, UserId,
};
use crate::domain::short_stay::{
    find_conflict, reservation_changed, ListingStatus, Reservation, ReservationStatus, StayDates,
    StayListing,
};
use crate::ports::{ReservationRepository, StayListingRepository, StaySearch};

use super::{contains_ci, paginate, InMemoryStore, Tables};

impl Tables {
    fn reservations_for(&self, listing: &ListingId) -> Vec<Reservation> {
        self.reservations
            .values()
            .filter(|r| &r.listing_id == listing)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl StayListingRepository for InMemoryStore {
    async fn create(&self, listing: &StayListing) -> Result<(), DomainError> {
        self.tables().stay_listings.insert(listing.id, listing.clone());
        Ok(())
    }

    async fn update(&self, listing: &StayListing) -> Result<(), DomainError> {
        let mut t = self.tables();
        match t.stay_listings.get_mut(&listing.id) {
            Some(existing) => {
                *existing = listing.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(
                ErrorCode::ListingNotFound,
                "Listing",
                listing.id,
            )),
        }
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<StayListing>, DomainError> {
        Ok(self.tables().stay_listings.get(id).cloned())
    }

    async fn search(
        &self,
        search: &StaySearch,
        now: Timestamp,
        page: PageRequest,
    ) -> Result<Page<StayListing>, DomainError> {
        let t = self.tables();
        let mut found: Vec<StayListing> = t
            .stay_listings
            .values()
            .filter(|l| l.status == ListingStatus::Active)
            .filter(|l| {
                search
                    .city
                    .as_deref()
                    .map(|c| contains_ci(&l.details.city, c))
                    .unwrap_or(true)
            })
            .filter(|l| {
                search
                    .guests
                    .map(|g| g <= l.details.max_guests as i64)
                    .unwrap_or(true)
            })
            .filter(|l| search.max_rate.map(|r| l.details.nightly_rate <= r).unwrap_or(true))
            .filter(|l| match &search.dates {
                Some(dates) => find_conflict(dates, &t.reservations_for(&l.id), now).is_none(),
                None => true,
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(found, page))
    }

    async fn list_by_host(&self, host: &UserId) -> Result<Vec<StayListing>, DomainError> {
        let t = self.tables();
        let mut found: Vec<StayListing> = t
            .stay_listings
            .values()
            .filter(|l| &l.host_id == host)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn delete(&self, id: &ListingId, today: NaiveDate) -> Result<bool, DomainError> {
        let mut t = self.tables();
        if !t.stay_listings.contains_key(id) {
            return Ok(false);
        }
        let upcoming = t.reservations.values().any(|r| {
            &r.listing_id == id
                && r.status == ReservationStatus::Confirmed
                && r.dates.check_out > today
        });
        if upcoming {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Listing has upcoming confirmed reservations",
            ));
        }
        t.reservations.retain(|_, r| &r.listing_id != id);
        t.stay_listings.remove(id);
        Ok(true)
    }
}

#[async_trait]
impl ReservationRepository for InMemoryStore {
    async fn reserve(&self, reservation: &Reservation, now: Timestamp) -> Result<(), DomainError> {
        let mut t = self.tables();
        let existing = t.reservations_for(&reservation.listing_id);
        if let Some(conflict) = find_conflict(&reservation.dates, &existing, now) {
            return Err(DomainError::new(
                ErrorCode::DatesUnavailable,
                "Selected dates are no longer available",
            )
            .with_detail("conflicting_check_in", conflict.dates.check_in.to_string()));
        }
        t.reservations.insert(reservation.id, reservation.clone());
        Ok(())
    }

    async fn update(
        &self,
        reservation: &Reservation,
        expected: ReservationStatus,
    ) -> Result<(), DomainError> {
        let mut t = self.tables();
        match t.reservations.get_mut(&reservation.id) {
            Some(existing) if reservation.may_replace(existing, expected) => {
                *existing = reservation.clone();
                Ok(())
            }
            Some(_) => Err(reservation_changed()),
            None => Err(DomainError::not_found(
                ErrorCode::ReservationNotFound,
                "Reservation",
                reservation.id,
            )),
        }
    }

    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, DomainError> {
        Ok(self.tables().reservations.get(id).cloned())
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Reservation>, DomainError> {
        Ok(self
            .tables()
            .reservations
            .values()
            .find(|r| r.payment_order_id.as_deref() == Some(order_id))
            .cloned())
    }

    async fn list_for_guest(&self, guest: &UserId) -> Result<Vec<Reservation>, DomainError> {
        let t = self.tables();
        let mut found: Vec<Reservation> = t
            .reservations
            .values()
            .filter(|r| &r.guest_id == guest)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn list_for_host(&self, host: &UserId) -> Result<Vec<Reservation>, DomainError> {
        let t = self.tables();
        let mut found: Vec<Reservation> = t
            .reservations
            .values()
            .filter(|r| &r.host_id == host)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn blocked_ranges(
        &self,
        listing: &ListingId,
        from: NaiveDate,
        now: Timestamp,
    ) -> Result<Vec<StayDates>, DomainError> {
        let t = self.tables();
        let mut ranges: Vec<StayDates> = t
            .reservations
            .values()
            .filter(|r| &r.listing_id == listing && r.blocks_dates(now) && r.dates.check_out > from)
            .map(|r| r.dates)
            .collect();
        ranges.sort_by_key(|d| d.check_in);
        Ok(ranges)
    }

    async fn expire_stale_holds(&self, now: Timestamp) -> Result<u64, DomainError> {
        let mut t = self.tables();
        let mut expired = 0;
        for r in t.reservations.values_mut() {
            if r.status == ReservationStatus::Pending && !r.hold_is_live(now) {
                r.status = ReservationStatus::Cancelled;
                r.updated_at = now;
                expired += 1;
            }
        }
        Ok(expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::short_stay::sample_listing_input;

    fn day(offset: i64) -> NaiveDate {
        Timestamp::now().add_days(offset).date()
    }

    async fn listing(store: &InMemoryStore) -> StayListing {
        let listing = StayListing::create(UserId::new(), sample_listing_input().validate().unwrap());
        StayListingRepository::create(store, &listing).await.unwrap();
        listing
    }

    fn hold(listing: &StayListing, from: i64, to: i64, now: Timestamp) -> Reservation {
        let dates = StayDates::new(day(from), day(to)).unwrap();
        Reservation::hold(listing, UserId::new(), dates, 2, 30, now).unwrap()
    }

    #[tokio::test]
    async fn overlapping_reservation_is_refused() {
        let store = InMemoryStore::new();
        let l = listing(&store).await;
        let now = Timestamp::now();

        store.reserve(&hold(&l, 10, 13, now), now).await.unwrap();
        let err = store.reserve(&hold(&l, 12, 15, now), now).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DatesUnavailable);

        store.reserve(&hold(&l, 13, 15, now), now).await.unwrap();
    }

    #[tokio::test]
    async fn lapsed_hold_frees_dates() {
        let store = InMemoryStore::new();
        let l = listing(&store).await;
        let earlier = Timestamp::now().plus_minutes(-60);

        store.reserve(&hold(&l, 10, 12, earlier), earlier).await.unwrap();
        let now = Timestamp::now();
        assert!(store.blocked_ranges(&l.id, day(0), now).await.unwrap().is_empty());
        assert_eq!(store.expire_stale_holds(now).await.unwrap(), 1);
        store.reserve(&hold(&l, 10, 12, now), now).await.unwrap();
    }

    #[tokio::test]
    async fn search_excludes_listings_booked_for_requested_dates() {
        let store = InMemoryStore::new();
        let booked = listing(&store).await;
        let free = listing(&store).await;
        let now = Timestamp::now();
        store.reserve(&hold(&booked, 5, 8, now), now).await.unwrap();

        let search = StaySearch {
            dates: Some(StayDates::new(day(6), day(7)).unwrap()),
            ..Default::default()
        };
        let page = StayListingRepository::search(&store, &search, now, PageRequest::default())
            .await
            .unwrap();
        let ids: Vec<_> = page.items.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![free.id]);
    }

    #[tokio::test]
    async fn listing_with_upcoming_stay_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let l = listing(&store).await;
        let now = Timestamp::now();
        let mut r = hold(&l, 3, 5, now);
        store.reserve(&r, now).await.unwrap();
        r.confirm("pay_1".into(), now).unwrap();
        ReservationRepository::update(&store, &r, ReservationStatus::Pending)
            .await
            .unwrap();

        let err = StayListingRepository::delete(&store, &l.id, day(0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn confirm_read_before_cancel_cannot_overwrite_it() {
        let store = InMemoryStore::new();
        let l = listing(&store).await;
        let now = Timestamp::now();
        let held = hold(&l, 3, 5, now);
        store.reserve(&held, now).await.unwrap();

        let mut paid = held.clone();
        let mut cancelled = held.clone();
        cancelled.cancel(&held.host_id, day(0)).unwrap();
        ReservationRepository::update(&store, &cancelled, ReservationStatus::Pending)
            .await
            .unwrap();

        paid.confirm("pay_late".into(), now).unwrap();
        let err = ReservationRepository::update(&store, &paid, ReservationStatus::Pending)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        let stored = ReservationRepository::find_by_id(&store, &held.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, ReservationStatus::Cancelled);
        assert_eq!(stored.payment_id, None);
    }

    #[tokio::test]
    async fn confirm_racing_the_sweep_cannot_double_book() {
        let store = InMemoryStore::new();
        let l = listing(&store).await;
        let placed = Timestamp::now().plus_minutes(-29);
        let held = hold(&l, 10, 12, placed);
        store.reserve(&held, placed).await.unwrap();

        let mut paid = held.clone();
        paid.confirm("pay_1".into(), placed.plus_minutes(28)).unwrap();

        let later = Timestamp::now().plus_minutes(5);
        assert_eq!(store.expire_stale_holds(later).await.unwrap(), 1);
        store.reserve(&hold(&l, 10, 12, later), later).await.unwrap();

        let err = ReservationRepository::update(&store, &paid, ReservationStatus::Pending)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(store.blocked_ranges(&l.id, day(0), later).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn pending_row_cannot_move_on_after_its_hold_lapsed() {
        let store = InMemoryStore::new();
        let l = listing(&store).await;
        let placed = Timestamp::now().plus_minutes(-60);
        let held = hold(&l, 10, 12, placed);
        store.reserve(&held, placed).await.unwrap();

        let mut late = held.clone();
        late.attach_order("order_late".into());
        let err = ReservationRepository::update(&store, &late, ReservationStatus::Pending)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        let mut cancelled = held.clone();
        cancelled.cancel(&held.guest_id, day(0)).unwrap();
        ReservationRepository::update(&store, &cancelled, ReservationStatus::Pending)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_of_unknown_reservation_is_not_found() {
        let store = InMemoryStore::new();
        let l = listing(&store).await;
        let r = hold(&l, 3, 5, Timestamp::now());
        let err = ReservationRepository::update(&store, &r, ReservationStatus::Pending)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationNotFound);
    }
}
