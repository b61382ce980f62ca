//! ChangeUserRoleHandler - Promote or demote an account.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, UserId, UserRole};
use crate::domain::user::UserProfile;
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct ChangeUserRoleCommand {
    pub actor: AuthenticatedUser,
    pub user_id: UserId,
    pub role: UserRole,
}

pub struct ChangeUserRoleHandler {
    users: Arc<dyn UserRepository>,
}

impl ChangeUserRoleHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Admins cannot change their own role.
    pub async fn handle(&self, cmd: ChangeUserRoleCommand) -> Result<UserProfile, DomainError> {
        cmd.actor.require_admin()?;
        if cmd.actor.id == cmd.user_id {
            return Err(DomainError::validation("user_id", "You cannot change your own role"));
        }

        let mut user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::UserNotFound, "User", cmd.user_id))?;
        user.set_role(cmd.role);
        self.users.update(&user).await?;

        tracing::info!(
            user_id = %user.id,
            role = %user.role.as_str(),
            admin_id = %cmd.actor.id,
            "User role changed"
        );
        Ok(user.profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{admin_user, caller, verified_user};

    #[tokio::test]
    async fn admin_promotes_user() {
        let store = InMemoryStore::new();
        let admin = admin_user(&store).await;
        let user = verified_user(&store, "asha@example.com").await;

        let profile = ChangeUserRoleHandler::new(Arc::new(store.clone()))
            .handle(ChangeUserRoleCommand {
                actor: caller(&admin),
                user_id: user.id,
                role: UserRole::Admin,
            })
            .await
            .unwrap();
        assert_eq!(profile.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn admin_cannot_demote_self() {
        let store = InMemoryStore::new();
        let admin = admin_user(&store).await;

        let err = ChangeUserRoleHandler::new(Arc::new(store.clone()))
            .handle(ChangeUserRoleCommand {
                actor: caller(&admin),
                user_id: admin.id,
                role: UserRole::User,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
