//! HTTP handlers for `/api/wishlists`. All require authentication.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::engagement::{
    AddToWishlistCommand, ListWishlistQuery, RemoveFromWishlistCommand,
};
use crate::domain::foundation::{PageQuery, PropertyId};

use super::super::error::ApiError;
use super::super::middleware::RequireAuth;
use super::super::properties::dto::PropertyResponse;
use super::super::state::AppState;
use super::dto::{WishlistChangeResponse, WishlistIdsResponse};

/// GET /api/wishlists - saved properties, newest first
pub async fn list_wishlist(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .list_wishlist_handler()
        .handle(ListWishlistQuery {
            user_id: user.id,
            page: page.into(),
        })
        .await?;
    Ok(Json(page.map(PropertyResponse::from)))
}

/// GET /api/wishlists/ids
pub async fn wishlist_ids(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let property_ids = state.wishlist_ids_handler().handle(user.id).await?;
    Ok(Json(WishlistIdsResponse { property_ids }))
}

/// POST /api/wishlists/:property_id - idempotent
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(property_id): Path<PropertyId>,
) -> Result<impl IntoResponse, ApiError> {
    let changed = state
        .add_to_wishlist_handler()
        .handle(AddToWishlistCommand {
            user_id: user.id,
            property_id,
        })
        .await?;
    Ok(Json(WishlistChangeResponse {
        property_id,
        saved: true,
        changed,
    }))
}

/// DELETE /api/wishlists/:property_id
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(property_id): Path<PropertyId>,
) -> Result<impl IntoResponse, ApiError> {
    let changed = state
        .remove_from_wishlist_handler()
        .handle(RemoveFromWishlistCommand {
            user_id: user.id,
            property_id,
        })
        .await?;
    Ok(Json(WishlistChangeResponse {
        property_id,
        saved: false,
        changed,
    }))
}
