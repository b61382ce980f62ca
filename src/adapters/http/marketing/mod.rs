//! HTTP adapter for leads and the newsletter.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::marketing_routes;
