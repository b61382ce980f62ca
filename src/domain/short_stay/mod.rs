//! Short-stay rentals: listings, date ranges and reservations.

mod dates;
mod listing;
mod reservation;

pub use dates::StayDates;
pub use listing::{
    ListingStatus, StayListing, StayListingDetails, StayListingInput, MAX_GUESTS, MAX_STAY_NIGHTS,
};
pub use reservation::{
    find_conflict, reservation_changed, Reservation, ReservationStatus, StayQuote,
};

#[cfg(test)]
pub(crate) use listing::tests::sample_input as sample_listing_input;
