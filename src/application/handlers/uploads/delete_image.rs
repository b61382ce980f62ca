//! DeleteImageHandler - Admin removes a stored image.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError};
use crate::ports::MediaStorage;

#[derive(Debug, Clone)]
pub struct DeleteImageCommand {
    pub actor: AuthenticatedUser,
    pub public_id: String,
}

pub struct DeleteImageHandler {
    storage: Arc<dyn MediaStorage>,
}

impl DeleteImageHandler {
    pub fn new(storage: Arc<dyn MediaStorage>) -> Self {
        Self { storage }
    }

    pub async fn handle(&self, cmd: DeleteImageCommand) -> Result<(), DomainError> {
        cmd.actor.require_admin()?;
        let public_id = cmd.public_id.trim();
        if public_id.is_empty() || !public_id.starts_with("estatehub/") {
            return Err(DomainError::validation("public_id", "Unknown image id"));
        }
        self.storage.delete(public_id).await?;
        tracing::info!(public_id, admin_id = %cmd.actor.id, "Image deleted");
        Ok(())
    }
}
