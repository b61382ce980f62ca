//! HTTP adapter for image uploads.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::upload_routes;
