//! CreateStayListingHandler - Hosts publish a short-stay listing.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::short_stay::{StayListing, StayListingInput};
use crate::ports::StayListingRepository;

#[derive(Debug, Clone)]
pub struct CreateStayListingCommand {
    pub host_id: UserId,
    pub input: StayListingInput,
}

pub struct CreateStayListingHandler {
    listings: Arc<dyn StayListingRepository>,
}

impl CreateStayListingHandler {
    pub fn new(listings: Arc<dyn StayListingRepository>) -> Self {
        Self { listings }
    }

    pub async fn handle(&self, cmd: CreateStayListingCommand) -> Result<StayListing, DomainError> {
        let listing = StayListing::create(cmd.host_id, cmd.input.validate()?);
        self.listings.create(&listing).await?;
        tracing::info!(listing_id = %listing.id, host_id = %cmd.host_id, "Stay listing created");
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::short_stay::{sample_listing_input, ListingStatus};

    #[tokio::test]
    async fn listing_starts_active() {
        let store = InMemoryStore::new();
        let listing = CreateStayListingHandler::new(Arc::new(store))
            .handle(CreateStayListingCommand {
                host_id: UserId::new(),
                input: sample_listing_input(),
            })
            .await
            .unwrap();
        assert_eq!(listing.status, ListingStatus::Active);
    }

    #[tokio::test]
    async fn max_nights_below_min_is_rejected() {
        let store = InMemoryStore::new();
        let mut input = sample_listing_input();
        input.max_nights = 1;
        let err = CreateStayListingHandler::new(Arc::new(store))
            .handle(CreateStayListingCommand {
                host_id: UserId::new(),
                input,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
