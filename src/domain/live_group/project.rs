//! Live-group project aggregate.

use serde::Serialize;

use crate::domain::foundation::{
    string_enum, validation, DomainError, ProjectId, StateMachine, Timestamp,
};

pub const MAX_GROUP_DISCOUNT_PCT: i64 = 50;

string_enum! {
    pub enum ProjectStatus {
        /// Being set up by admins; not visible publicly.
        Draft => "draft",
        /// Open for holds and bookings.
        Live => "live",
        /// No further bookings.
        Closed => "closed",
    }
}

impl ProjectStatus {
    pub fn is_public(&self) -> bool {
        !matches!(self, ProjectStatus::Draft)
    }
}

impl StateMachine for ProjectStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            ProjectStatus::Draft => vec![ProjectStatus::Live],
            ProjectStatus::Live => vec![ProjectStatus::Closed],
            ProjectStatus::Closed => vec![],
        }
    }
}

/// Editable project fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetails {
    pub name: String,
    pub developer: String,
    pub city: String,
    pub address: String,
    pub description: String,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub group_target: i32,
    pub group_discount_pct: i32,
    pub token_amount: i64,
}

/// Unvalidated project fields from an admin form.
#[derive(Debug, Clone, Default)]
pub struct ProjectInput {
    pub name: String,
    pub developer: String,
    pub city: String,
    pub address: String,
    pub description: String,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub group_target: i32,
    pub group_discount_pct: i32,
    pub token_amount: i64,
}

impl ProjectInput {
    pub fn validate(self) -> Result<ProjectDetails, DomainError> {
        Ok(ProjectDetails {
            name: validation::text("name", &self.name, 3, 150)?,
            developer: validation::text("developer", &self.developer, 2, 150)?,
            city: validation::text("city", &self.city, 2, 100)?,
            address: validation::text("address", &self.address, 5, 500)?,
            description: validation::text("description", &self.description, 0, 5000)?,
            amenities: validation::string_list("amenities", self.amenities, 50)?,
            images: validation::url_list("images", self.images, 20)?,
            group_target: validation::range("group_target", self.group_target as i64, 1, 10_000)?
                as i32,
            group_discount_pct: validation::range(
                "group_discount_pct",
                self.group_discount_pct as i64,
                0,
                MAX_GROUP_DISCOUNT_PCT,
            )? as i32,
            token_amount: validation::amount("token_amount", self.token_amount)?,
        })
    }
}

/// Collective-purchase project.
///
/// # Invariants
///
/// - `version` increases by one on every hierarchy sync
/// - only `Live` projects accept holds and bookings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub details: ProjectDetails,
    pub status: ProjectStatus,
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn create(details: ProjectDetails) -> Self {
        let now = Timestamp::now();
        Self {
            id: ProjectId::new(),
            details,
            status: ProjectStatus::Draft,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn edit(&mut self, details: ProjectDetails) {
        self.details = details;
        self.updated_at = Timestamp::now();
    }

    pub fn change_status(&mut self, target: ProjectStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Price after the group discount, rounded down to whole rupees.
    pub fn group_price(&self, list_price: i64) -> i64 {
        group_price(list_price, self.details.group_discount_pct)
    }
}

/// The discount is clamped to 0-100 and applied in `i128`, so the result
/// always lies between zero and `list_price` for a non-negative price.
pub fn group_price(list_price: i64, discount_pct: i32) -> i64 {
    let pct = discount_pct.clamp(0, 100) as i128;
    let discount = list_price as i128 * pct / 100;
    (list_price as i128 - discount) as i64
}

/// Booking progress towards the group target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectProgress {
    pub total_units: i64,
    pub available_units: i64,
    pub booked_units: i64,
    pub group_target: i32,
    pub target_reached: bool,
    /// Booked units as a share of the target, capped at 100.
    pub progress_pct: i32,
}

impl ProjectProgress {
    pub fn new(total_units: i64, available_units: i64, booked_units: i64, group_target: i32) -> Self {
        let target = group_target.max(1) as i64;
        Self {
            total_units,
            available_units,
            booked_units,
            group_target,
            target_reached: booked_units >= target,
            progress_pct: (booked_units * 100 / target).min(100) as i32,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    pub(crate) fn sample_input() -> ProjectInput {
        ProjectInput {
            name: "Skyline Residency".into(),
            developer: "Acme Builders".into(),
            city: "Bengaluru".into(),
            address: "Outer Ring Road, Bellandur".into(),
            description: String::new(),
            amenities: vec!["Pool".into()],
            images: vec![],
            group_target: 10,
            group_discount_pct: 8,
            token_amount: 50_000,
        }
    }

    #[test]
    fn discount_above_cap_is_rejected() {
        let mut input = sample_input();
        input.group_discount_pct = 60;
        assert_eq!(input.validate().unwrap_err().code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn token_amount_is_capped() {
        let mut input = sample_input();
        input.token_amount = i64::MAX;
        assert_eq!(input.validate().unwrap_err().code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn group_price_rounds_down() {
        assert_eq!(group_price(1_000_001, 10), 900_001);
        assert_eq!(group_price(5_000_000, 0), 5_000_000);
    }

    #[test]
    fn group_price_handles_extreme_list_prices() {
        assert_eq!(group_price(i64::MAX, 0), i64::MAX);
        assert_eq!(group_price(i64::MAX / 10, 20), i64::MAX / 10 - (i64::MAX / 10) / 5);
        assert_eq!(group_price(i64::MAX, 100), 0);
    }

    #[test]
    fn status_only_moves_forward() {
        let mut p = Project::create(sample_input().validate().unwrap());
        assert_eq!(p.status, ProjectStatus::Draft);
        p.change_status(ProjectStatus::Live).unwrap();
        assert!(p.change_status(ProjectStatus::Draft).is_err());
        p.change_status(ProjectStatus::Closed).unwrap();
        assert!(p.status.is_terminal());
    }

    #[test]
    fn progress_caps_at_hundred() {
        let progress = ProjectProgress::new(40, 10, 25, 20);
        assert!(progress.target_reached);
        assert_eq!(progress.progress_pct, 100);
        assert_eq!(ProjectProgress::new(40, 35, 5, 20).progress_pct, 25);
    }
}
