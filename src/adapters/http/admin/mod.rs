//! HTTP adapter for the admin console.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::admin_routes;
