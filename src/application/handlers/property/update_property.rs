//! UpdatePropertyHandler - Replaces listing content.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, PropertyId};
use crate::domain::property::{Property, PropertyInput};
use crate::ports::PropertyRepository;

use super::load_managed;

#[derive(Debug, Clone)]
pub struct UpdatePropertyCommand {
    pub actor: AuthenticatedUser,
    pub property_id: PropertyId,
    pub input: PropertyInput,
}

pub struct UpdatePropertyHandler {
    properties: Arc<dyn PropertyRepository>,
}

impl UpdatePropertyHandler {
    pub fn new(properties: Arc<dyn PropertyRepository>) -> Self {
        Self { properties }
    }

    pub async fn handle(&self, cmd: UpdatePropertyCommand) -> Result<Property, DomainError> {
        let details = cmd.input.validate()?;
        let mut property = load_managed(&self.properties, &cmd.actor, &cmd.property_id).await?;

        property.edit(details)?;
        self.properties.update(&property).await?;
        Ok(property)
    }
}
