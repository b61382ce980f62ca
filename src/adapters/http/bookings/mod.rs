//! HTTP adapter for site-visit bookings.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::booking_routes;
