//! Sale and rent listings.

use serde::Serialize;

use crate::domain::foundation::{
    string_enum, validation, DomainError, OwnedByUser, PropertyId, StateMachine, Timestamp,
    UserId, ValidationError,
};

/// Upper bound for bedrooms and bathrooms.
pub const MAX_ROOMS: i64 = 50;
pub const MAX_AMENITIES: usize = 50;
pub const MAX_IMAGES: usize = 20;

string_enum! {
    pub enum PropertyType {
        Apartment => "apartment",
        Villa => "villa",
        House => "house",
        Plot => "plot",
        Commercial => "commercial",
    }
}

string_enum! {
    pub enum ListingType {
        Sale => "sale",
        Rent => "rent",
    }
}

string_enum! {
    pub enum Furnishing {
        Unfurnished => "unfurnished",
        SemiFurnished => "semi_furnished",
        Furnished => "furnished",
    }
}

string_enum! {
    /// Moderation and sales lifecycle of a listing.
    pub enum PropertyStatus {
        /// Waiting for an admin to approve.
        PendingReview => "pending_review",
        /// Publicly searchable.
        Active => "active",
        Rejected => "rejected",
        Sold => "sold",
        Archived => "archived",
    }
}

impl StateMachine for PropertyStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PropertyStatus::*;
        match self {
            PendingReview => vec![Active, Rejected],
            Active => vec![Sold, Archived, PendingReview],
            Rejected => vec![PendingReview],
            Archived => vec![PendingReview],
            Sold => vec![],
        }
    }
}

/// Optional map pin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Result<Self, ValidationError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ValidationError::invalid_format("lat", "must be within -90..90"));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(ValidationError::invalid_format("lng", "must be within -180..180"));
        }
        Ok(Self { lat, lng })
    }
}

/// Validated listing content shared by create and full update.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDetails {
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub listing_type: ListingType,
    pub price: i64,
    pub area_sqft: i64,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub furnishing: Option<Furnishing>,
    pub city: String,
    pub locality: String,
    pub address: String,
    pub location: Option<GeoPoint>,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
}

/// Unvalidated listing content as received from a client.
#[derive(Debug, Clone, Default)]
pub struct PropertyInput {
    pub title: String,
    pub description: String,
    pub property_type: String,
    pub listing_type: String,
    pub price: i64,
    pub area_sqft: i64,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub furnishing: Option<String>,
    pub city: String,
    pub locality: String,
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
}

impl PropertyInput {
    pub fn validate(self) -> Result<PropertyDetails, DomainError> {
        let rooms = |field: &str, v: Option<i32>| -> Result<Option<i32>, ValidationError> {
            v.map(|n| validation::range(field, n as i64, 0, MAX_ROOMS).map(|n| n as i32))
                .transpose()
        };
        let location = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)?),
            (None, None) => None,
            _ => {
                return Err(DomainError::validation(
                    "location",
                    "lat and lng must be provided together",
                ))
            }
        };
        Ok(PropertyDetails {
            title: validation::text("title", &self.title, 5, 150)?,
            description: validation::text("description", &self.description, 0, 5000)?,
            property_type: self.property_type.parse()?,
            listing_type: self.listing_type.parse()?,
            price: validation::positive("price", self.price)?,
            area_sqft: validation::positive("area_sqft", self.area_sqft)?,
            bedrooms: rooms("bedrooms", self.bedrooms)?,
            bathrooms: rooms("bathrooms", self.bathrooms)?,
            furnishing: self.furnishing.as_deref().map(str::parse).transpose()?,
            city: validation::text("city", &self.city, 2, 100)?,
            locality: validation::text("locality", &self.locality, 2, 150)?,
            address: validation::text("address", &self.address, 5, 500)?,
            location,
            amenities: validation::string_list("amenities", self.amenities, MAX_AMENITIES)?,
            images: validation::url_list("images", self.images, MAX_IMAGES)?,
        })
    }
}

/// Listing aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id: PropertyId,
    pub owner_id: UserId,
    pub details: PropertyDetails,
    pub status: PropertyStatus,
    pub rejection_reason: Option<String>,
    pub featured: bool,
    pub view_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Property {
    /// New listings always start in review.
    pub fn create(owner_id: UserId, details: PropertyDetails) -> Self {
        let now = Timestamp::now();
        Self {
            id: PropertyId::new(),
            owner_id,
            details,
            status: PropertyStatus::PendingReview,
            rejection_reason: None,
            featured: false,
            view_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the content. Rejected and archived listings go back to review.
    pub fn edit(&mut self, details: PropertyDetails) -> Result<(), DomainError> {
        if self.status == PropertyStatus::Sold {
            self.status.transition_to(PropertyStatus::PendingReview)?;
        }
        if matches!(self.status, PropertyStatus::Rejected | PropertyStatus::Archived) {
            self.status = self.status.transition_to(PropertyStatus::PendingReview)?;
            self.rejection_reason = None;
        }
        self.details = details;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn approve(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(PropertyStatus::Active)?;
        self.rejection_reason = None;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn reject(&mut self, reason: &str) -> Result<(), DomainError> {
        let reason = validation::text("reason", reason, 3, 500)?;
        self.status = self.status.transition_to(PropertyStatus::Rejected)?;
        self.rejection_reason = Some(reason);
        self.featured = false;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn mark_sold(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(PropertyStatus::Sold)?;
        self.featured = false;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn archive(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(PropertyStatus::Archived)?;
        self.featured = false;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Only active listings may be featured.
    pub fn set_featured(&mut self, featured: bool) -> Result<(), DomainError> {
        if featured && self.status != PropertyStatus::Active {
            return Err(DomainError::validation(
                "featured",
                "Only active listings can be featured",
            ));
        }
        self.featured = featured;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn is_public(&self) -> bool {
        self.status == PropertyStatus::Active
    }
}

impl OwnedByUser for Property {
    fn owner_id(&self) -> &UserId {
        &self.owner_id
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    pub(crate) fn sample_input() -> PropertyInput {
        PropertyInput {
            title: "2BHK near Metro".into(),
            description: "Sunny flat".into(),
            property_type: "apartment".into(),
            listing_type: "sale".into(),
            price: 7_500_000,
            area_sqft: 1_050,
            bedrooms: Some(2),
            bathrooms: Some(2),
            furnishing: Some("semi_furnished".into()),
            city: "Pune".into(),
            locality: "Baner".into(),
            address: "12 Baner Road, Pune".into(),
            lat: Some(18.56),
            lng: Some(73.78),
            amenities: vec!["Lift".into(), "Gym".into()],
            images: vec!["https://res.cloudinary.com/demo/a.jpg".into()],
        }
    }

    #[test]
    fn valid_input_passes() {
        let details = sample_input().validate().unwrap();
        assert_eq!(details.property_type, PropertyType::Apartment);
        assert_eq!(details.furnishing, Some(Furnishing::SemiFurnished));
        assert!(details.location.is_some());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut input = sample_input();
        input.property_type = "castle".into();
        assert_eq!(input.validate().unwrap_err().code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn half_a_location_is_rejected() {
        let mut input = sample_input();
        input.lng = None;
        assert!(input.validate().is_err());
    }

    #[test]
    fn zero_price_is_rejected() {
        let mut input = sample_input();
        input.price = 0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn price_above_the_amount_cap_is_rejected() {
        let mut input = sample_input();
        input.price = validation::MAX_AMOUNT + 1;
        assert!(input.validate().is_err());
    }

    #[test]
    fn new_listing_waits_for_review() {
        let p = Property::create(UserId::new(), sample_input().validate().unwrap());
        assert_eq!(p.status, PropertyStatus::PendingReview);
        assert!(!p.is_public());
    }

    #[test]
    fn editing_rejected_listing_resubmits() {
        let mut p = Property::create(UserId::new(), sample_input().validate().unwrap());
        p.reject("Blurry photos").unwrap();
        p.edit(sample_input().validate().unwrap()).unwrap();
        assert_eq!(p.status, PropertyStatus::PendingReview);
        assert_eq!(p.rejection_reason, None);
    }

    #[test]
    fn sold_listing_cannot_be_edited() {
        let mut p = Property::create(UserId::new(), sample_input().validate().unwrap());
        p.approve().unwrap();
        p.mark_sold().unwrap();
        let err = p.edit(sample_input().validate().unwrap()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn only_active_listings_are_featured() {
        let mut p = Property::create(UserId::new(), sample_input().validate().unwrap());
        assert!(p.set_featured(true).is_err());
        p.approve().unwrap();
        p.set_featured(true).unwrap();
        p.archive().unwrap();
        assert!(!p.featured);
    }

    #[test]
    fn sold_is_terminal() {
        assert!(PropertyStatus::Sold.is_terminal());
        assert!(!PropertyStatus::Active.can_transition_to(&PropertyStatus::Rejected));
    }
}
