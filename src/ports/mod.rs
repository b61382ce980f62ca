//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Repository Ports
//!
//! - `UserRepository`, `OtpRepository` - Accounts and one-time passcodes
//! - `PropertyRepository` - Sale/rent listings
//! - `BookingRepository` - Site-visit bookings
//! - `ProjectRepository`, `UnitHoldRepository` - Live grouping
//! - `StayListingRepository`, `ReservationRepository` - Short stays
//! - `SubscriptionRepository` - Paid plans
//! - `WishlistRepository`, `ReviewRepository` - Buyer engagement
//! - `ChatRepository` - Buyer/owner conversations
//! - `LeadRepository` - Marketing leads and newsletter
//! - `AdminReader` - Dashboard aggregates
//!
//! ## Service Ports
//!
//! - `SessionValidator`, `TokenIssuer`, `PasswordHasher` - Authentication
//! - `EmailSender` - Transactional email
//! - `PaymentGateway` - Razorpay orders and signatures
//! - `MediaStorage` - Image uploads
//! - `RateLimiter` - Fixed-window request limiting
//! - `ChatBroadcaster` - Real-time chat fan-out

mod admin_reader;
mod booking_repository;
mod chat_repository;
mod email_sender;
mod engagement_repository;
mod lead_repository;
mod live_group_repository;
mod media_storage;
mod password_hasher;
mod payment_gateway;
mod property_repository;
mod rate_limiter;
mod session_validator;
mod short_stay_repository;
mod subscription_repository;
mod user_repository;

pub use admin_reader::{AdminReader, DashboardStats};
pub use booking_repository::BookingRepository;
pub use chat_repository::{ChatBroadcaster, ChatRepository};
pub use email_sender::{EmailError, EmailSender};
pub use engagement_repository::{ReviewRepository, ReviewView, WishlistRepository};
pub use lead_repository::{LeadFilter, LeadRepository};
pub use live_group_repository::{ProjectRepository, SyncPlanner, UnitHoldRepository};
pub use media_storage::{MediaError, MediaStorage, StoredMedia};
pub use password_hasher::PasswordHasher;
pub use payment_gateway::{GatewayOrder, PaymentError, PaymentGateway};
pub use property_repository::PropertyRepository;
pub use rate_limiter::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitScope,
    RateLimitStatus, RateLimiter,
};
pub use session_validator::{IssuedToken, SessionValidator, TokenIssuer};
pub use short_stay_repository::{ReservationRepository, StayListingRepository, StaySearch};
pub use subscription_repository::SubscriptionRepository;
pub use user_repository::{OtpRepository, UserFilter, UserRepository};
