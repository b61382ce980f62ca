//! ListUsersHandler - Account search for admins.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, Page, PageRequest};
use crate::domain::user::UserProfile;
use crate::ports::{UserFilter, UserRepository};

#[derive(Debug, Clone)]
pub struct ListUsersQuery {
    pub actor: AuthenticatedUser,
    pub filter: UserFilter,
    pub page: PageRequest,
}

pub struct ListUsersHandler {
    users: Arc<dyn UserRepository>,
}

impl ListUsersHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, query: ListUsersQuery) -> Result<Page<UserProfile>, DomainError> {
        query.actor.require_admin()?;
        let page = self.users.list(&query.filter, query.page).await?;
        Ok(page.map(|u| u.profile()))
    }
}
