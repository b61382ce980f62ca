//! UpdateProfileHandler - Edits name, phone and avatar.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::user::{ProfileUpdate, UserProfile};
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct UpdateProfileCommand {
    pub user_id: UserId,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

pub struct UpdateProfileHandler {
    users: Arc<dyn UserRepository>,
}

impl UpdateProfileHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: UpdateProfileCommand) -> Result<UserProfile, DomainError> {
        let update = ProfileUpdate::new(
            cmd.name.as_deref(),
            cmd.phone.as_deref(),
            cmd.avatar_url.as_deref(),
        )?;
        let mut user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::UserNotFound, "User", cmd.user_id))?;

        user.apply_profile(update);
        self.users.update(&user).await?;
        Ok(user.profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::verified_user;

    #[tokio::test]
    async fn changes_only_given_fields() {
        let store = InMemoryStore::new();
        let user = verified_user(&store, "asha@example.com").await;
        let handler = UpdateProfileHandler::new(Arc::new(store.clone()));

        let profile = handler
            .handle(UpdateProfileCommand {
                user_id: user.id,
                name: Some("Asha Menon".into()),
                phone: None,
                avatar_url: None,
            })
            .await
            .unwrap();

        assert_eq!(profile.name, "Asha Menon");
        assert_eq!(profile.email, user.email);
    }
}
