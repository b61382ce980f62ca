//! HTTP DTOs for admin endpoints.

use serde::Deserialize;

use crate::application::handlers::property::ModerateAction;
use crate::domain::foundation::{PageRequest, UserRole};
use crate::domain::property::PropertyStatus;
use crate::ports::UserFilter;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListParams {
    pub q: Option<String>,
    pub role: Option<UserRole>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl UserListParams {
    pub fn into_parts(self) -> (UserFilter, PageRequest) {
        (
            UserFilter {
                q: self.q.filter(|q| !q.trim().is_empty()),
                role: self.role,
            },
            PageRequest::new(self.page, self.per_page),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyListParams {
    pub status: Option<PropertyStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Moderation decision, tagged by `action`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ModerateRequest {
    Approve,
    Reject { reason: String },
    Feature { featured: bool },
}

impl From<ModerateRequest> for ModerateAction {
    fn from(r: ModerateRequest) -> Self {
        match r {
            ModerateRequest::Approve => ModerateAction::Approve,
            ModerateRequest::Reject { reason } => ModerateAction::Reject { reason },
            ModerateRequest::Feature { featured } => ModerateAction::Feature(featured),
        }
    }
}
