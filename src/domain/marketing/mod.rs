//! Marketing leads and newsletter subscriptions.

use serde::Serialize;

use crate::domain::foundation::{
    string_enum, validation, DomainError, LeadId, PropertyId, StateMachine, Timestamp, UserId,
};

string_enum! {
    pub enum LeadSource {
        Website => "website",
        LandingPage => "landing_page",
        PropertyInquiry => "property_inquiry",
        LiveGroup => "live_group",
        Referral => "referral",
        Other => "other",
    }
}

string_enum! {
    pub enum LeadStatus {
        New => "new",
        Contacted => "contacted",
        Qualified => "qualified",
        Converted => "converted",
        Closed => "closed",
    }
}

impl StateMachine for LeadStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use LeadStatus::*;
        match self {
            New => vec![Contacted, Closed],
            Contacted => vec![Qualified, Closed],
            Qualified => vec![Converted, Closed],
            Converted | Closed => vec![],
        }
    }
}

/// Campaign attribution captured with a lead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Utm {
    pub source: Option<String>,
    pub medium: Option<String>,
    pub campaign: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: LeadSource,
    pub interest: Option<String>,
    pub message: Option<String>,
    pub property_id: Option<PropertyId>,
    pub user_id: Option<UserId>,
    pub utm: Utm,
    pub status: LeadStatus,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct LeadInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub interest: Option<String>,
    pub message: Option<String>,
    pub property_id: Option<PropertyId>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
}

impl Lead {
    /// Validates a public lead submission. Email or phone is required.
    pub fn capture(input: LeadInput, user_id: Option<UserId>) -> Result<Self, DomainError> {
        let email = match input.email.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(e) => Some(validation::email(e)?),
        };
        let phone = validation::optional_phone(input.phone.as_deref())?;
        if email.is_none() && phone.is_none() {
            return Err(DomainError::validation("email", "Provide an email or phone number"));
        }
        let source = match input.source.as_deref() {
            None | Some("") => LeadSource::Website,
            Some(s) => s.parse()?,
        };
        let now = Timestamp::now();
        Ok(Self {
            id: LeadId::new(),
            name: validation::text("name", &input.name, 2, 100)?,
            email,
            phone,
            source,
            interest: validation::optional_text("interest", input.interest.as_deref(), 200)?,
            message: validation::optional_text("message", input.message.as_deref(), 2000)?,
            property_id: input.property_id,
            user_id,
            utm: Utm {
                source: validation::optional_text("utm_source", input.utm_source.as_deref(), 100)?,
                medium: validation::optional_text("utm_medium", input.utm_medium.as_deref(), 100)?,
                campaign: validation::optional_text(
                    "utm_campaign",
                    input.utm_campaign.as_deref(),
                    100,
                )?,
            },
            status: LeadStatus::New,
            notes: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Admin follow-up: optional status move plus notes.
    pub fn follow_up(&mut self, status: Option<LeadStatus>, notes: Option<&str>) -> Result<(), DomainError> {
        if let Some(target) = status.filter(|s| s != &self.status) {
            self.status = self.status.transition_to(target)?;
        }
        if notes.is_some() {
            self.notes = validation::optional_text("notes", notes, 5000)?;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

/// Normalizes a newsletter address.
pub fn newsletter_email(raw: &str) -> Result<String, DomainError> {
    Ok(validation::email(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn input() -> LeadInput {
        LeadInput {
            name: "Ravi".into(),
            email: Some("Ravi@Example.com".into()),
            source: Some("landing_page".into()),
            ..Default::default()
        }
    }

    #[test]
    fn lead_needs_email_or_phone() {
        let mut i = input();
        i.email = None;
        assert!(Lead::capture(i.clone(), None).is_err());
        i.phone = Some("9876543210".into());
        assert!(Lead::capture(i, None).is_ok());
    }

    #[test]
    fn lead_defaults() {
        let mut i = input();
        i.source = None;
        let lead = Lead::capture(i, None).unwrap();
        assert_eq!(lead.source, LeadSource::Website);
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.email.as_deref(), Some("ravi@example.com"));
    }

    #[test]
    fn follow_up_walks_pipeline() {
        let mut lead = Lead::capture(input(), None).unwrap();
        lead.follow_up(Some(LeadStatus::Contacted), Some("Called")).unwrap();
        let err = lead.follow_up(Some(LeadStatus::Converted), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        lead.follow_up(Some(LeadStatus::Closed), None).unwrap();
        assert_eq!(lead.notes.as_deref(), Some("Called"));
    }

    #[test]
    fn same_status_only_updates_notes() {
        let mut lead = Lead::capture(input(), None).unwrap();
        lead.follow_up(Some(LeadStatus::New), Some("Left voicemail")).unwrap();
        assert_eq!(lead.status, LeadStatus::New);
    }
}
