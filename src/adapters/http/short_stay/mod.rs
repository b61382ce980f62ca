//! HTTP adapter for short-stay listings and reservations.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::short_stay_routes;
