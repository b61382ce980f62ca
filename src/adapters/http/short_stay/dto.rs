//! HTTP DTOs for short-stay rentals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ListingId, PageRequest, ReservationId, Timestamp, UserId,
};
use crate::domain::short_stay::{
    ListingStatus, Reservation, ReservationStatus, StayDates, StayListing, StayListingInput,
};
use crate::ports::StaySearch;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct StayListingRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub city: String,
    #[serde(default)]
    pub address: String,
    pub nightly_rate: i64,
    #[serde(default)]
    pub cleaning_fee: i64,
    pub max_guests: i32,
    #[serde(default = "default_min_nights")]
    pub min_nights: i32,
    #[serde(default = "default_max_nights")]
    pub max_nights: i32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub house_rules: Option<String>,
    /// Only honoured on update.
    #[serde(default)]
    pub status: Option<ListingStatus>,
}

fn default_min_nights() -> i32 {
    1
}

fn default_max_nights() -> i32 {
    30
}

impl StayListingRequest {
    pub fn into_parts(self) -> (StayListingInput, Option<ListingStatus>) {
        let status = self.status;
        let input = StayListingInput {
            title: self.title,
            description: self.description,
            city: self.city,
            address: self.address,
            nightly_rate: self.nightly_rate,
            cleaning_fee: self.cleaning_fee,
            max_guests: self.max_guests,
            min_nights: self.min_nights,
            max_nights: self.max_nights,
            amenities: self.amenities,
            images: self.images,
            house_rules: self.house_rules,
        };
        (input, status)
    }
}

/// Query string for `GET /listings`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaySearchParams {
    pub city: Option<String>,
    pub guests: Option<i64>,
    pub max_rate: Option<i64>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl StaySearchParams {
    /// Dates only filter when both ends are given.
    pub fn into_parts(self) -> Result<(StaySearch, PageRequest), DomainError> {
        let dates = match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => Some(StayDates::new(check_in, check_out)?),
            _ => None,
        };
        let search = StaySearch {
            city: self.city.filter(|c| !c.trim().is_empty()),
            guests: self.guests,
            max_rate: self.max_rate,
            dates,
        };
        Ok((search, PageRequest::new(self.page, self.per_page)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteParams {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "default_guests")]
    pub guests: i32,
}

fn default_guests() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReserveRequest {
    pub listing_id: ListingId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "default_guests")]
    pub guests: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmPaymentRequest {
    #[serde(alias = "razorpay_order_id")]
    pub order_id: String,
    #[serde(alias = "razorpay_payment_id")]
    pub payment_id: String,
    #[serde(alias = "razorpay_signature")]
    pub signature: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct StayListingResponse {
    pub id: ListingId,
    pub host_id: UserId,
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
    pub status: ListingStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<StayListing> for StayListingResponse {
    fn from(l: StayListing) -> Self {
        let d = l.details;
        Self {
            id: l.id,
            host_id: l.host_id,
            title: d.title,
            description: d.description,
            city: d.city,
            address: d.address,
            nightly_rate: d.nightly_rate,
            cleaning_fee: d.cleaning_fee,
            max_guests: d.max_guests,
            min_nights: d.min_nights,
            max_nights: d.max_nights,
            amenities: d.amenities,
            images: d.images,
            house_rules: d.house_rules,
            status: l.status,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservationResponse {
    pub id: ReservationId,
    pub listing_id: ListingId,
    pub guest_id: UserId,
    pub host_id: UserId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub guests: i32,
    pub nightly_rate: i64,
    pub cleaning_fee: i64,
    pub total: i64,
    pub status: ReservationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_expires_at: Option<Timestamp>,
    pub payment_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            listing_id: r.listing_id,
            guest_id: r.guest_id,
            host_id: r.host_id,
            check_in: r.dates.check_in,
            check_out: r.dates.check_out,
            nights: r.dates.nights(),
            guests: r.guests,
            nightly_rate: r.nightly_rate,
            cleaning_fee: r.cleaning_fee,
            total: r.total,
            hold_expires_at: if r.status == ReservationStatus::Pending {
                r.hold_expires_at
            } else {
                None
            },
            status: r.status,
            payment_id: r.payment_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn search_ignores_half_a_date_range() {
        let params = StaySearchParams {
            check_in: Some(date("2030-01-10")),
            ..Default::default()
        };
        let (search, _) = params.into_parts().unwrap();
        assert!(search.dates.is_none());
    }

    #[test]
    fn search_rejects_inverted_dates() {
        let params = StaySearchParams {
            check_in: Some(date("2030-01-10")),
            check_out: Some(date("2030-01-08")),
            ..Default::default()
        };
        assert!(params.into_parts().is_err());
    }

    #[test]
    fn blank_city_is_no_filter() {
        let params = StaySearchParams {
            city: Some("  ".into()),
            ..Default::default()
        };
        assert!(params.into_parts().unwrap().0.city.is_none());
    }

    #[test]
    fn listing_request_defaults_night_bounds() {
        let req: StayListingRequest = serde_json::from_str(
            r#"{"title":"Sea view loft","city":"Goa","nightly_rate":4000,"max_guests":3}"#,
        )
        .unwrap();
        let (input, status) = req.into_parts();
        assert_eq!(input.min_nights, 1);
        assert_eq!(input.max_nights, 30);
        assert!(status.is_none());
    }
}
