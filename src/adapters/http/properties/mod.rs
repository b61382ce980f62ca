//! HTTP adapter for sale and rent listings.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::PropertyResponse;
pub use routes::property_routes;
