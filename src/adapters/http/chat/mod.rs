//! HTTP adapter for buyer/owner chat.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::chat_routes;
