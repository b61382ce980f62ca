//! HTTP adapter for registration, sign-in and account management.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::auth_routes;
