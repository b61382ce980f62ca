//! EstateHub - Real-estate marketplace API
//!
//! Property listings with site-visit bookings, live-group buying of project
//! units under time-limited locks, short-stay reservations, paid
//! subscriptions, buyer/owner chat and an admin console.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
