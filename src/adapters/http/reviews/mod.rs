//! HTTP adapter for property reviews.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::review_routes;
