//! HTTP DTOs for property listing endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PageRequest, PropertyId, Timestamp, UserId};
use crate::domain::property::{
    Furnishing, GeoPoint, ListingType, Property, PropertyInput, PropertySearch, PropertySort,
    PropertyStatus, PropertyType,
};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of create and full update. Enum fields stay strings so the domain
/// reports which one is invalid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PropertyRequest {
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

impl From<PropertyRequest> for PropertyInput {
    fn from(req: PropertyRequest) -> Self {
        PropertyInput {
            title: req.title,
            description: req.description,
            property_type: req.property_type,
            listing_type: req.listing_type,
            price: req.price,
            area_sqft: req.area_sqft,
            bedrooms: req.bedrooms,
            bathrooms: req.bathrooms,
            furnishing: req.furnishing,
            city: req.city,
            locality: req.locality,
            address: req.address,
            lat: req.lat,
            lng: req.lng,
            amenities: req.amenities,
            images: req.images,
        }
    }
}

/// `GET /api/properties` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub city: Option<String>,
    pub locality: Option<String>,
    pub q: Option<String>,
    pub property_type: Option<PropertyType>,
    pub listing_type: Option<ListingType>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_bedrooms: Option<i32>,
    pub sort: Option<PropertySort>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl SearchParams {
    pub fn into_parts(self) -> (PropertySearch, PageRequest) {
        let page = PageRequest::new(self.page, self.per_page);
        let search = PropertySearch {
            city: self.city,
            locality: self.locality,
            q: self.q,
            property_type: self.property_type,
            listing_type: self.listing_type,
            min_price: self.min_price,
            max_price: self.max_price,
            min_bedrooms: self.min_bedrooms,
            sort: self.sort.unwrap_or_default(),
        };
        (search, page)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct PropertyResponse {
    pub id: PropertyId,
    pub owner_id: UserId,
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
    pub status: PropertyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub featured: bool,
    pub view_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Property> for PropertyResponse {
    fn from(p: Property) -> Self {
        let d = p.details;
        Self {
            id: p.id,
            owner_id: p.owner_id,
            title: d.title,
            description: d.description,
            property_type: d.property_type,
            listing_type: d.listing_type,
            price: d.price,
            area_sqft: d.area_sqft,
            bedrooms: d.bedrooms,
            bathrooms: d.bathrooms,
            furnishing: d.furnishing,
            city: d.city,
            locality: d.locality,
            address: d.address,
            location: d.location,
            amenities: d.amenities,
            images: d.images,
            status: p.status,
            rejection_reason: p.rejection_reason,
            featured: p.featured,
            view_count: p.view_count,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
