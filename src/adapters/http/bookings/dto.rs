//! HTTP DTOs for site-visit bookings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::booking::{Booking, BookingStatus, TimeSlot};
use crate::domain::foundation::{BookingId, PropertyId, Timestamp, UserId};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub property_id: PropertyId,
    pub visit_date: NaiveDate,
    pub time_slot: String,
    pub contact_phone: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: BookingId,
    pub property_id: PropertyId,
    pub visitor_id: UserId,
    pub owner_id: UserId,
    pub visit_date: NaiveDate,
    pub time_slot: TimeSlot,
    pub contact_phone: String,
    pub message: Option<String>,
    pub status: BookingStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            property_id: b.property_id,
            visitor_id: b.visitor_id,
            owner_id: b.owner_id,
            visit_date: b.visit_date,
            time_slot: b.time_slot,
            contact_phone: b.contact_phone,
            message: b.message,
            status: b.status,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}
