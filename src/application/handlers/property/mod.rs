//! Property listing handlers.
//!
//! ## Commands
//! - `CreatePropertyHandler` - New listing, bounded by the plan's listing limit
//! - `UpdatePropertyHandler` - Owner edits, resubmitting rejected or archived listings
//! - `ChangePropertyStatusHandler` - Mark sold or archive
//! - `DeletePropertyHandler` - Owner or admin removal
//! - `ModeratePropertyHandler` - Admin approve, reject and feature
//!
//! ## Queries
//! - `GetPropertyHandler` - Visibility rules plus view counting
//! - `SearchPropertiesHandler` - Public search over active listings

mod change_status;
mod create_property;
mod delete_property;
mod get_property;
mod moderate_property;
mod search_properties;
mod update_property;

pub use change_status::{
    ChangePropertyStatusCommand, ChangePropertyStatusHandler, OwnerStatusAction,
};
pub use create_property::{CreatePropertyCommand, CreatePropertyHandler};
pub use delete_property::{DeletePropertyCommand, DeletePropertyHandler};
pub use get_property::{GetPropertyHandler, GetPropertyQuery};
pub use moderate_property::{ModerateAction, ModeratePropertyCommand, ModeratePropertyHandler};
pub use search_properties::{SearchPropertiesHandler, SearchPropertiesQuery};
pub use update_property::{UpdatePropertyCommand, UpdatePropertyHandler};

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, PropertyId};
use crate::domain::property::Property;
use crate::ports::PropertyRepository;

/// Loads a listing the caller may change: its owner or an admin.
pub(crate) async fn load_managed(
    properties: &Arc<dyn PropertyRepository>,
    actor: &AuthenticatedUser,
    id: &PropertyId,
) -> Result<Property, DomainError> {
    let property = properties
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(ErrorCode::PropertyNotFound, "Property", id))?;
    if !actor.can_manage(&property.owner_id) {
        return Err(DomainError::forbidden("You cannot modify this listing"));
    }
    Ok(property)
}
