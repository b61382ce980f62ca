//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - sqlx repositories and migrations
//! - `memory` - In-process store used by tests and local runs
//! - `auth` - JWT sessions and Argon2 password hashing
//! - `email` - SMTP, Brevo and log-only senders
//! - `razorpay` - Payment gateway client
//! - `cloudinary` - Image storage client
//! - `rate_limiter` - Fixed-window limiters (in-memory, Redis)
//! - `http` - axum REST API
//! - `websocket` - Real-time chat rooms

pub mod auth;
pub mod cloudinary;
pub mod email;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod rate_limiter;
pub mod razorpay;
pub mod websocket;
