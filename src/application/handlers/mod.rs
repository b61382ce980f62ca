//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations, one
//! module per API area. Handlers depend only on ports; the HTTP layer builds
//! them from `AppState`.

pub mod admin;
pub mod auth;
pub mod booking;
pub mod chat;
pub mod engagement;
pub mod live_group;
pub mod marketing;
pub mod property;
pub mod short_stay;
pub mod subscription;
pub mod uploads;

#[cfg(test)]
pub(crate) mod test_support;
