//! DeleteStayListingHandler - Removes a listing without upcoming stays.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, ListingId, Timestamp};
use crate::ports::StayListingRepository;

use super::load_listing;

#[derive(Debug, Clone)]
pub struct DeleteStayListingCommand {
    pub actor: AuthenticatedUser,
    pub listing_id: ListingId,
}

pub struct DeleteStayListingHandler {
    listings: Arc<dyn StayListingRepository>,
}

impl DeleteStayListingHandler {
    pub fn new(listings: Arc<dyn StayListingRepository>) -> Self {
        Self { listings }
    }

    pub async fn handle(&self, cmd: DeleteStayListingCommand) -> Result<(), DomainError> {
        let listing = load_listing(&self.listings, &cmd.listing_id).await?;
        if !cmd.actor.can_manage(&listing.host_id) {
            return Err(DomainError::forbidden("You cannot delete this listing"));
        }
        if !self.listings.delete(&listing.id, Timestamp::now().date()).await? {
            return Err(DomainError::not_found(ErrorCode::ListingNotFound, "Listing", listing.id));
        }
        tracing::info!(listing_id = %listing.id, "Stay listing deleted");
        Ok(())
    }
}
