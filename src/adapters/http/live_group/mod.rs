//! HTTP adapter for live grouping: projects, unit holds and the admin tree editor.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::live_group_routes;
