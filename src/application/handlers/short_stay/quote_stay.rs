//! QuoteStayHandler - Prices a stay without holding dates.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::foundation::{DomainError, ListingId};
use crate::domain::short_stay::{StayDates, StayQuote};
use crate::ports::StayListingRepository;

use super::load_listing;

#[derive(Debug, Clone)]
pub struct QuoteStayQuery {
    pub listing_id: ListingId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
}

pub struct QuoteStayHandler {
    listings: Arc<dyn StayListingRepository>,
}

impl QuoteStayHandler {
    pub fn new(listings: Arc<dyn StayListingRepository>) -> Self {
        Self { listings }
    }

    pub async fn handle(&self, query: QuoteStayQuery) -> Result<StayQuote, DomainError> {
        let dates = StayDates::new(query.check_in, query.check_out)?;
        let listing = load_listing(&self.listings, &query.listing_id).await?;
        StayQuote::for_listing(&listing, &dates, query.guests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::short_stay::fixtures::{day, listing};
    use crate::application::handlers::test_support::verified_user;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn quote_adds_cleaning_fee_once() {
        let store = InMemoryStore::new();
        let host = verified_user(&store, "host@example.com").await;
        let l = listing(&store, &host).await;
        let handler = QuoteStayHandler::new(Arc::new(store.clone()));

        let quote = handler
            .handle(QuoteStayQuery {
                listing_id: l.id,
                check_in: day(10),
                check_out: day(14),
                guests: 2,
            })
            .await
            .unwrap();
        assert_eq!(quote.nights, 4);
        assert_eq!(quote.total, 4 * 4000 + 500);

        let err = handler
            .handle(QuoteStayQuery {
                listing_id: l.id,
                check_in: day(10),
                check_out: day(11),
                guests: 2,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
