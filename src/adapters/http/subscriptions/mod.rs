//! HTTP adapter for plans, subscription checkout and the payment webhook.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::subscription_routes;
