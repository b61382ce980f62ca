//! HTTP adapter for saved properties.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::wishlist_routes;
