use std::cmp::Ordering;

use async_trait::async_trait;

use crate::domain::booking::Booking;
use crate::domain::foundation::{
    BookingId, DomainError, ErrorCode, Page, PageRequest, PropertyId, ReviewId, Timestamp, UserId,
};
use crate::domain::property::{Property, PropertySearch, PropertySort, PropertyStatus};
use crate::domain::review::{Review, ReviewSummary};
use crate::ports::{
    BookingRepository, PropertyRepository, ReviewRepository, ReviewView, WishlistRepository,
};

use super::{contains_ci, paginate, InMemoryStore};

fn matches(property: &Property, search: &PropertySearch) -> bool {
    let d = &property.details;
    let text = |filter: &Option<String>, value: &str| {
        filter.as_deref().map(|f| contains_ci(value, f)).unwrap_or(true)
    };
    property.status == PropertyStatus::Active
        && text(&search.city, &d.city)
        && text(&search.locality, &d.locality)
        && search
            .q
            .as_deref()
            .map(|q| contains_ci(&d.title, q) || contains_ci(&d.description, q))
            .unwrap_or(true)
        && search.property_type.map(|t| d.property_type == t).unwrap_or(true)
        && search.listing_type.map(|t| d.listing_type == t).unwrap_or(true)
        && search.min_price.map(|p| d.price >= p).unwrap_or(true)
        && search.max_price.map(|p| d.price <= p).unwrap_or(true)
        && search
            .min_bedrooms
            .map(|n| d.bedrooms.unwrap_or(0) >= n)
            .unwrap_or(true)
}

fn search_order(sort: PropertySort) -> impl Fn(&Property, &Property) -> Ordering {
    move |a, b| {
        b.featured.cmp(&a.featured).then_with(|| match sort {
            PropertySort::Newest => b.created_at.cmp(&a.created_at),
            PropertySort::PriceAsc => a.details.price.cmp(&b.details.price),
            PropertySort::PriceDesc => b.details.price.cmp(&a.details.price),
        })
    }
}

#[async_trait]
impl PropertyRepository for InMemoryStore {
    async fn create(&self, property: &Property) -> Result<(), DomainError> {
        self.tables().properties.insert(property.id, property.clone());
        Ok(())
    }

    async fn update(&self, property: &Property) -> Result<(), DomainError> {
        let mut t = self.tables();
        match t.properties.get_mut(&property.id) {
            Some(existing) => {
                *existing = property.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(
                ErrorCode::PropertyNotFound,
                "Property",
                property.id,
            )),
        }
    }

    async fn find_by_id(&self, id: &PropertyId) -> Result<Option<Property>, DomainError> {
        Ok(self.tables().properties.get(id).cloned())
    }

    async fn search(&self, search: &PropertySearch, page: PageRequest) -> Result<Page<Property>, DomainError> {
        let t = self.tables();
        let mut found: Vec<Property> = t
            .properties
            .values()
            .filter(|p| matches(p, search))
            .cloned()
            .collect();
        found.sort_by(search_order(search.sort));
        Ok(paginate(found, page))
    }

    async fn list_by_owner(&self, owner: &UserId, page: PageRequest) -> Result<Page<Property>, DomainError> {
        let t = self.tables();
        let mut owned: Vec<Property> = t
            .properties
            .values()
            .filter(|p| &p.owner_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(owned, page))
    }

    async fn list_by_status(
        &self,
        status: Option<PropertyStatus>,
        page: PageRequest,
    ) -> Result<Page<Property>, DomainError> {
        let t = self.tables();
        let mut found: Vec<Property> = t
            .properties
            .values()
            .filter(|p| status.map(|s| p.status == s).unwrap_or(true))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(found, page))
    }

    async fn count_counted_for_owner(&self, owner: &UserId) -> Result<i64, DomainError> {
        let t = self.tables();
        Ok(t.properties
            .values()
            .filter(|p| &p.owner_id == owner)
            .filter(|p| {
                matches!(
                    p.status,
                    PropertyStatus::PendingReview | PropertyStatus::Active | PropertyStatus::Rejected
                )
            })
            .count() as i64)
    }

    async fn increment_views(&self, id: &PropertyId) -> Result<(), DomainError> {
        if let Some(p) = self.tables().properties.get_mut(id) {
            p.view_count += 1;
        }
        Ok(())
    }

    async fn delete(&self, id: &PropertyId) -> Result<bool, DomainError> {
        Ok(self.tables().remove_property(id))
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn create(&self, booking: &Booking) -> Result<(), DomainError> {
        let mut t = self.tables();
        let duplicate = t.bookings.values().any(|b| {
            b.visitor_id == booking.visitor_id
                && b.property_id == booking.property_id
                && b.status.is_open()
        });
        if duplicate {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "You already have an open visit request for this property",
            ));
        }
        t.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), DomainError> {
        let mut t = self.tables();
        match t.bookings.get_mut(&booking.id) {
            Some(existing) => {
                *existing = booking.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(
                ErrorCode::BookingNotFound,
                "Booking",
                booking.id,
            )),
        }
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        Ok(self.tables().bookings.get(id).cloned())
    }

    async fn has_open_booking(&self, visitor: &UserId, property: &PropertyId) -> Result<bool, DomainError> {
        Ok(self.tables().bookings.values().any(|b| {
            &b.visitor_id == visitor && &b.property_id == property && b.status.is_open()
        }))
    }

    async fn list_for_visitor(&self, visitor: &UserId, page: PageRequest) -> Result<Page<Booking>, DomainError> {
        let t = self.tables();
        let mut found: Vec<Booking> = t
            .bookings
            .values()
            .filter(|b| &b.visitor_id == visitor)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(found, page))
    }

    async fn list_for_owner(&self, owner: &UserId, page: PageRequest) -> Result<Page<Booking>, DomainError> {
        let t = self.tables();
        let mut found: Vec<Booking> = t
            .bookings
            .values()
            .filter(|b| &b.owner_id == owner)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(found, page))
    }
}

#[async_trait]
impl WishlistRepository for InMemoryStore {
    async fn add(&self, user: &UserId, property: &PropertyId) -> Result<bool, DomainError> {
        let mut t = self.tables();
        if t.wishlists.iter().any(|(u, p, _)| u == user && p == property) {
            return Ok(false);
        }
        t.wishlists.push((*user, *property, Timestamp::now()));
        Ok(true)
    }

    async fn remove(&self, user: &UserId, property: &PropertyId) -> Result<bool, DomainError> {
        let mut t = self.tables();
        let before = t.wishlists.len();
        t.wishlists.retain(|(u, p, _)| !(u == user && p == property));
        Ok(t.wishlists.len() != before)
    }

    async fn list(&self, user: &UserId, page: PageRequest) -> Result<Page<Property>, DomainError> {
        let t = self.tables();
        let mut saved: Vec<(Timestamp, Property)> = t
            .wishlists
            .iter()
            .filter(|(u, _, _)| u == user)
            .filter_map(|(_, p, at)| t.properties.get(p).map(|prop| (*at, prop.clone())))
            .collect();
        saved.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(paginate(saved.into_iter().map(|(_, p)| p).collect(), page))
    }

    async fn contains(&self, user: &UserId, property: &PropertyId) -> Result<bool, DomainError> {
        Ok(self
            .tables()
            .wishlists
            .iter()
            .any(|(u, p, _)| u == user && p == property))
    }

    async fn saved_ids(&self, user: &UserId) -> Result<Vec<PropertyId>, DomainError> {
        Ok(self
            .tables()
            .wishlists
            .iter()
            .filter(|(u, _, _)| u == user)
            .map(|(_, p, _)| *p)
            .collect())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn create(&self, review: &Review) -> Result<(), DomainError> {
        let mut t = self.tables();
        if t.reviews
            .values()
            .any(|r| r.author_id == review.author_id && r.property_id == review.property_id)
        {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "You have already reviewed this property",
            ));
        }
        t.reviews.insert(review.id, review.clone());
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<(), DomainError> {
        let mut t = self.tables();
        match t.reviews.get_mut(&review.id) {
            Some(existing) => {
                *existing = review.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(ErrorCode::ReviewNotFound, "Review", review.id)),
        }
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, DomainError> {
        Ok(self.tables().reviews.remove(id).is_some())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, DomainError> {
        Ok(self.tables().reviews.get(id).cloned())
    }

    async fn list_for_property(
        &self,
        property: &PropertyId,
        page: PageRequest,
    ) -> Result<Page<ReviewView>, DomainError> {
        let t = self.tables();
        let mut views: Vec<ReviewView> = t
            .reviews
            .values()
            .filter(|r| &r.property_id == property)
            .map(|r| ReviewView {
                review: r.clone(),
                author_name: t
                    .users
                    .get(&r.author_id)
                    .map(|u| u.name.clone())
                    .unwrap_or_default(),
            })
            .collect();
        views.sort_by(|a, b| b.review.created_at.cmp(&a.review.created_at));
        Ok(paginate(views, page))
    }

    async fn summary(&self, property: &PropertyId) -> Result<ReviewSummary, DomainError> {
        let t = self.tables();
        let mut distribution = [0u64; 5];
        for r in t.reviews.values().filter(|r| &r.property_id == property) {
            let star = r.rating.value().clamp(1, 5) as usize;
            distribution[star - 1] += 1;
        }
        Ok(ReviewSummary::from_distribution(distribution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::property::PropertyInput;

    fn property(owner: UserId, city: &str, price: i64) -> Property {
        let details = PropertyInput {
            title: "Sunny apartment".into(),
            property_type: "apartment".into(),
            listing_type: "sale".into(),
            price,
            area_sqft: 1100,
            city: city.into(),
            locality: "Central".into(),
            address: "1 Main Road".into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let mut p = Property::create(owner, details);
        p.approve().unwrap();
        p
    }

    #[tokio::test]
    async fn search_puts_featured_first_then_sorts_by_price() {
        let store = InMemoryStore::new();
        let owner = UserId::new();
        let cheap = property(owner, "Pune", 3_000_000);
        let pricey = property(owner, "Pune", 9_000_000);
        let mut featured = property(owner, "Pune", 6_000_000);
        featured.set_featured(true).unwrap();
        let elsewhere = property(owner, "Mumbai", 1_000_000);
        for p in [&cheap, &pricey, &featured, &elsewhere] {
            PropertyRepository::create(&store, p).await.unwrap();
        }

        let search = PropertySearch {
            city: Some("pune".into()),
            sort: PropertySort::PriceAsc,
            ..Default::default()
        };
        let page = store.search(&search, PageRequest::default()).await.unwrap();

        let ids: Vec<_> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![featured.id, cheap.id, pricey.id]);
    }

    #[tokio::test]
    async fn pending_listings_are_not_searchable_but_count_toward_limit() {
        let store = InMemoryStore::new();
        let owner = UserId::new();
        let mut pending = property(owner, "Pune", 1);
        pending.status = PropertyStatus::PendingReview;
        PropertyRepository::create(&store, &pending).await.unwrap();

        let page = store
            .search(&PropertySearch::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(store.count_counted_for_owner(&owner).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn second_review_by_same_author_conflicts() {
        let store = InMemoryStore::new();
        let property_id = PropertyId::new();
        let owner = UserId::new();
        let author = UserId::new();
        let first = Review::write(property_id, &owner, author, 4, None).unwrap();
        let second = Review::write(property_id, &owner, author, 5, None).unwrap();

        ReviewRepository::create(&store, &first).await.unwrap();
        let err = ReviewRepository::create(&store, &second).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        let summary = store.summary(&property_id).await.unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.distribution[3], 1);
    }

    #[tokio::test]
    async fn wishlist_add_is_idempotent() {
        let store = InMemoryStore::new();
        let user = UserId::new();
        let p = property(UserId::new(), "Pune", 100);
        PropertyRepository::create(&store, &p).await.unwrap();

        assert!(WishlistRepository::add(&store, &user, &p.id).await.unwrap());
        assert!(!WishlistRepository::add(&store, &user, &p.id).await.unwrap());
        let page = WishlistRepository::list(&store, &user, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }
}
