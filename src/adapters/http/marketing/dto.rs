//! HTTP DTOs for marketing.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{LeadId, PageRequest, PropertyId};
use crate::domain::marketing::{LeadInput, LeadSource, LeadStatus};
use crate::ports::LeadFilter;

#[derive(Debug, Clone, Deserialize)]
pub struct LeadRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub interest: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub property_id: Option<PropertyId>,
    #[serde(default)]
    pub utm_source: Option<String>,
    #[serde(default)]
    pub utm_medium: Option<String>,
    #[serde(default)]
    pub utm_campaign: Option<String>,
}

impl From<LeadRequest> for LeadInput {
    fn from(r: LeadRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            phone: r.phone,
            source: r.source,
            interest: r.interest,
            message: r.message,
            property_id: r.property_id,
            utm_source: r.utm_source,
            utm_medium: r.utm_medium,
            utm_campaign: r.utm_campaign,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadReceipt {
    pub id: LeadId,
    pub message: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsletterRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsletterResponse {
    pub subscribed: bool,
    /// False when the address was already in the requested state.
    pub changed: bool,
}

/// Query string for the admin lead list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadListParams {
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl LeadListParams {
    pub fn into_parts(self) -> (LeadFilter, PageRequest) {
        (
            LeadFilter {
                status: self.status,
                source: self.source,
            },
            PageRequest::new(self.page, self.per_page),
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLeadRequest {
    #[serde(default)]
    pub status: Option<LeadStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}
