//! Short-stay listings offered by hosts.

use crate::domain::foundation::{
    string_enum, validation, DomainError, ListingId, OwnedByUser, Timestamp, UserId,
};

pub const MAX_STAY_NIGHTS: i64 = 365;
pub const MAX_GUESTS: i64 = 50;

string_enum! {
    pub enum ListingStatus {
        Active => "active",
        Inactive => "inactive",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StayListingDetails {
    pub title: String,
    pub description: String,
    pub city: String,
    pub address: String,
    pub nightly_rate: i64,
    pub cleaning_fee: i64,
    pub max_guests: i32,
    pub min_nights: i32,
    pub max_nights: i32,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub house_rules: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StayListingInput {
    pub title: String,
    pub description: String,
    pub city: String,
    pub address: String,
    pub nightly_rate: i64,
    pub cleaning_fee: i64,
    pub max_guests: i32,
    pub min_nights: i32,
    pub max_nights: i32,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub house_rules: Option<String>,
}

impl StayListingInput {
    pub fn validate(self) -> Result<StayListingDetails, DomainError> {
        let min_nights = validation::range("min_nights", self.min_nights as i64, 1, MAX_STAY_NIGHTS)?;
        let max_nights =
            validation::range("max_nights", self.max_nights as i64, min_nights, MAX_STAY_NIGHTS)?;
        Ok(StayListingDetails {
            title: validation::text("title", &self.title, 5, 150)?,
            description: validation::text("description", &self.description, 0, 5000)?,
            city: validation::text("city", &self.city, 2, 100)?,
            address: validation::text("address", &self.address, 5, 500)?,
            nightly_rate: validation::positive("nightly_rate", self.nightly_rate)?,
            cleaning_fee: validation::amount("cleaning_fee", self.cleaning_fee)?,
            max_guests: validation::range("max_guests", self.max_guests as i64, 1, MAX_GUESTS)? as i32,
            min_nights: min_nights as i32,
            max_nights: max_nights as i32,
            amenities: validation::string_list("amenities", self.amenities, 50)?,
            images: validation::url_list("images", self.images, 20)?,
            house_rules: validation::optional_text("house_rules", self.house_rules.as_deref(), 2000)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StayListing {
    pub id: ListingId,
    pub host_id: UserId,
    pub details: StayListingDetails,
    pub status: ListingStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StayListing {
    pub fn create(host_id: UserId, details: StayListingDetails) -> Self {
        let now = Timestamp::now();
        Self {
            id: ListingId::new(),
            host_id,
            details,
            status: ListingStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update(&mut self, details: StayListingDetails, status: Option<ListingStatus>) {
        self.details = details;
        if let Some(status) = status {
            self.status = status;
        }
        self.updated_at = Timestamp::now();
    }

    pub fn is_bookable(&self) -> bool {
        self.status == ListingStatus::Active
    }
}

impl OwnedByUser for StayListing {
    fn owner_id(&self) -> &UserId {
        &self.host_id
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_input() -> StayListingInput {
        StayListingInput {
            title: "Beachside cottage".into(),
            description: "Two rooms by the sea".into(),
            city: "Goa".into(),
            address: "Calangute Beach Road".into(),
            nightly_rate: 4_000,
            cleaning_fee: 500,
            max_guests: 4,
            min_nights: 2,
            max_nights: 14,
            amenities: vec!["Wifi".into()],
            images: vec![],
            house_rules: Some("No parties".into()),
        }
    }

    #[test]
    fn max_nights_cannot_be_below_min() {
        let mut input = sample_input();
        input.max_nights = 1;
        assert!(input.validate().is_err());
    }

    #[test]
    fn free_cleaning_is_fine_but_free_nights_are_not() {
        let mut input = sample_input();
        input.cleaning_fee = 0;
        assert!(input.clone().validate().is_ok());
        input.nightly_rate = 0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn rates_above_the_amount_cap_are_rejected() {
        let mut input = sample_input();
        input.nightly_rate = validation::MAX_AMOUNT;
        input.cleaning_fee = validation::MAX_AMOUNT;
        assert!(input.clone().validate().is_ok());
        input.nightly_rate = i64::MAX / 2;
        assert!(input.clone().validate().is_err());
        input.nightly_rate = 4_000;
        input.cleaning_fee = validation::MAX_AMOUNT + 1;
        assert!(input.validate().is_err());
    }

    #[test]
    fn new_listing_is_bookable() {
        let listing = StayListing::create(UserId::new(), sample_input().validate().unwrap());
        assert!(listing.is_bookable());
    }
}
