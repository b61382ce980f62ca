//! GetStayListingHandler - Listing detail.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, ListingId};
use crate::domain::short_stay::StayListing;
use crate::ports::StayListingRepository;

use super::load_listing;

#[derive(Debug, Clone)]
pub struct GetStayListingQuery {
    pub listing_id: ListingId,
    pub viewer: Option<AuthenticatedUser>,
}

pub struct GetStayListingHandler {
    listings: Arc<dyn StayListingRepository>,
}

impl GetStayListingHandler {
    pub fn new(listings: Arc<dyn StayListingRepository>) -> Self {
        Self { listings }
    }

    pub async fn handle(&self, query: GetStayListingQuery) -> Result<StayListing, DomainError> {
        let listing = load_listing(&self.listings, &query.listing_id).await?;
        let manager = query
            .viewer
            .as_ref()
            .map(|v| v.can_manage(&listing.host_id))
            .unwrap_or(false);
        if !listing.is_bookable() && !manager {
            return Err(DomainError::not_found(ErrorCode::ListingNotFound, "Listing", listing.id));
        }
        Ok(listing)
    }
}
