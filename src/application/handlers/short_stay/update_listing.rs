//! UpdateStayListingHandler - Host edits and activation toggles.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ListingId};
use crate::domain::short_stay::{ListingStatus, StayListing, StayListingInput};
use crate::ports::StayListingRepository;

use super::load_listing;

#[derive(Debug, Clone)]
pub struct UpdateStayListingCommand {
    pub actor: AuthenticatedUser,
    pub listing_id: ListingId,
    pub input: StayListingInput,
    pub status: Option<ListingStatus>,
}

pub struct UpdateStayListingHandler {
    listings: Arc<dyn StayListingRepository>,
}

impl UpdateStayListingHandler {
    pub fn new(listings: Arc<dyn StayListingRepository>) -> Self {
        Self { listings }
    }

    pub async fn handle(&self, cmd: UpdateStayListingCommand) -> Result<StayListing, DomainError> {
        let details = cmd.input.validate()?;
        let mut listing = load_listing(&self.listings, &cmd.listing_id).await?;
        if !cmd.actor.can_manage(&listing.host_id) {
            return Err(DomainError::forbidden("You cannot modify this listing"));
        }

        listing.update(details, cmd.status);
        self.listings.update(&listing).await?;
        Ok(listing)
    }
}
