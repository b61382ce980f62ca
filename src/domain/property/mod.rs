//! Property listings for sale and rent.

mod listing;
mod search;

pub use listing::{
    Furnishing, GeoPoint, ListingType, Property, PropertyDetails, PropertyInput, PropertyStatus,
    PropertyType, MAX_AMENITIES, MAX_IMAGES, MAX_ROOMS,
};
pub use search::{like_pattern, PropertySearch, PropertySort};

#[cfg(test)]
pub(crate) use listing::tests::sample_input;
