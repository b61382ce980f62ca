//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `user` - Accounts and one-time passcodes
//! - `property` - Sale/rent listings and search filters
//! - `booking` - Site-visit bookings
//! - `live_group` - Collective-purchase projects, unit holds, hierarchy sync
//! - `short_stay` - Short-stay listings and reservations
//! - `subscription` - Listing plans and payment verification
//! - `review` - Property reviews and rating summaries
//! - `chat` - Buyer/owner conversations
//! - `marketing` - Leads and newsletter
//! - `notification` - Transactional email templates

pub mod booking;
pub mod chat;
pub mod foundation;
pub mod live_group;
pub mod marketing;
pub mod notification;
pub mod property;
pub mod review;
pub mod short_stay;
pub mod subscription;
pub mod user;
