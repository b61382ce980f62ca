//! DeleteUserHandler - Admin removes an account with the full cascade.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, UserId};
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct DeleteUserCommand {
    pub actor: AuthenticatedUser,
    pub user_id: UserId,
}

pub struct DeleteUserHandler {
    users: Arc<dyn UserRepository>,
}

impl DeleteUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: DeleteUserCommand) -> Result<(), DomainError> {
        cmd.actor.require_admin()?;
        if cmd.actor.id == cmd.user_id {
            return Err(DomainError::validation(
                "user_id",
                "Use account settings to delete your own account",
            ));
        }
        if self.users.find_by_id(&cmd.user_id).await?.is_none() {
            return Err(DomainError::not_found(ErrorCode::UserNotFound, "User", cmd.user_id));
        }

        self.users.delete_cascade(&cmd.user_id).await?;
        tracing::info!(user_id = %cmd.user_id, admin_id = %cmd.actor.id, "User deleted by admin");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{active_property, admin_user, caller, verified_user};
    use crate::ports::PropertyRepository;

    #[tokio::test]
    async fn deleting_user_removes_their_listings() {
        let store = InMemoryStore::new();
        let admin = admin_user(&store).await;
        let owner = verified_user(&store, "owner@example.com").await;
        let property = active_property(&store, &owner).await;

        DeleteUserHandler::new(Arc::new(store.clone()))
            .handle(DeleteUserCommand {
                actor: caller(&admin),
                user_id: owner.id,
            })
            .await
            .unwrap();
        assert!(UserRepository::find_by_id(&store, &owner.id).await.unwrap().is_none());
        assert!(PropertyRepository::find_by_id(&store, &property.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let store = InMemoryStore::new();
        let admin = admin_user(&store).await;

        let err = DeleteUserHandler::new(Arc::new(store.clone()))
            .handle(DeleteUserCommand {
                actor: caller(&admin),
                user_id: UserId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }
}
