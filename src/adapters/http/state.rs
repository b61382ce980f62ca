//! Shared application state for the REST API.
//!
//! `AppState` is cloned into every request. It holds the ports as
//! `Arc<dyn Trait>` and builds application handlers on demand.

use std::sync::Arc;

use sqlx::PgPool;

use crate::adapters::memory::InMemoryStore;
use crate::adapters::postgres::{
    PostgresAdminReader, PostgresBookingRepository, PostgresChatRepository,
    PostgresLeadRepository, PostgresLiveGroupRepository, PostgresOtpRepository,
    PostgresPropertyRepository, PostgresReservationRepository, PostgresReviewRepository,
    PostgresStayListingRepository, PostgresSubscriptionRepository, PostgresUserRepository,
    PostgresWishlistRepository,
};
use crate::adapters::websocket::RoomManager;
use crate::application::handlers::{
    admin, auth, booking, chat, engagement, live_group, marketing, property, short_stay,
    subscription, uploads,
};
use crate::application::Notifier;
use crate::config::{AppConfig, LiveGroupConfig, ShortStayConfig, StorageConfig};
use crate::domain::live_group::LockPolicy;
use crate::ports::{
    AdminReader, BookingRepository, ChatBroadcaster, ChatRepository, LeadRepository,
    MediaStorage, OtpRepository, PasswordHasher, PaymentGateway, ProjectRepository,
    PropertyRepository, RateLimiter, ReservationRepository, ReviewRepository, SessionValidator,
    StayListingRepository, SubscriptionRepository, TokenIssuer, UnitHoldRepository,
    UserRepository, WishlistRepository,
};

// ════════════════════════════════════════════════════════════════════════════════
// Wiring
// ════════════════════════════════════════════════════════════════════════════════

/// Every repository port, backed by one store.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub otps: Arc<dyn OtpRepository>,
    pub properties: Arc<dyn PropertyRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub units: Arc<dyn UnitHoldRepository>,
    pub listings: Arc<dyn StayListingRepository>,
    pub reservations: Arc<dyn ReservationRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub wishlists: Arc<dyn WishlistRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub chats: Arc<dyn ChatRepository>,
    pub leads: Arc<dyn LeadRepository>,
    pub admin: Arc<dyn AdminReader>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        let live_group = Arc::new(PostgresLiveGroupRepository::new(pool.clone()));
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            otps: Arc::new(PostgresOtpRepository::new(pool.clone())),
            properties: Arc::new(PostgresPropertyRepository::new(pool.clone())),
            bookings: Arc::new(PostgresBookingRepository::new(pool.clone())),
            projects: live_group.clone(),
            units: live_group,
            listings: Arc::new(PostgresStayListingRepository::new(pool.clone())),
            reservations: Arc::new(PostgresReservationRepository::new(pool.clone())),
            subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
            wishlists: Arc::new(PostgresWishlistRepository::new(pool.clone())),
            reviews: Arc::new(PostgresReviewRepository::new(pool.clone())),
            chats: Arc::new(PostgresChatRepository::new(pool.clone())),
            leads: Arc::new(PostgresLeadRepository::new(pool.clone())),
            admin: Arc::new(PostgresAdminReader::new(pool)),
        }
    }

    pub fn in_memory(store: InMemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            otps: store.clone(),
            properties: store.clone(),
            bookings: store.clone(),
            projects: store.clone(),
            units: store.clone(),
            listings: store.clone(),
            reservations: store.clone(),
            subscriptions: store.clone(),
            wishlists: store.clone(),
            reviews: store.clone(),
            chats: store.clone(),
            leads: store.clone(),
            admin: store,
        }
    }
}

/// External services and authentication.
#[derive(Clone)]
pub struct Services {
    pub sessions: Arc<dyn SessionValidator>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub storage: Arc<dyn MediaStorage>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub notifier: Notifier,
}

/// Tunables handed to handlers.
#[derive(Debug, Clone, Copy)]
pub struct ApiSettings {
    pub otp_ttl_minutes: i64,
    pub otp_max_attempts: u32,
    pub lock_policy: LockPolicy,
    pub hold_minutes: i64,
    pub max_advance_days: i64,
    pub max_upload_bytes: usize,
}

impl ApiSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            otp_ttl_minutes: config.auth.otp_ttl_minutes,
            otp_max_attempts: config.auth.otp_max_attempts,
            lock_policy: config.live_group.lock_policy(),
            hold_minutes: config.short_stay.hold_minutes,
            max_advance_days: config.short_stay.max_advance_days,
            max_upload_bytes: config.storage.max_upload_bytes,
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        let short_stay = ShortStayConfig::default();
        Self {
            otp_ttl_minutes: 10,
            otp_max_attempts: 5,
            lock_policy: LiveGroupConfig::default().lock_policy(),
            hold_minutes: short_stay.hold_minutes,
            max_advance_days: short_stay.max_advance_days,
            max_upload_bytes: StorageConfig::default().max_upload_bytes,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub services: Services,
    pub settings: ApiSettings,
    pub rooms: Arc<RoomManager>,
    /// Present when running against PostgreSQL; used by the readiness probe.
    pub db: Option<PgPool>,
}

impl AppState {
    pub fn new(repos: Repositories, services: Services, settings: ApiSettings) -> Self {
        Self {
            repos,
            services,
            settings,
            rooms: Arc::new(RoomManager::default()),
            db: None,
        }
    }

    pub fn with_database(mut self, pool: PgPool) -> Self {
        self.db = Some(pool);
        self
    }

    fn broadcaster(&self) -> Arc<dyn ChatBroadcaster> {
        self.rooms.clone()
    }

    fn notifier(&self) -> Notifier {
        self.services.notifier.clone()
    }

    // ── auth ────────────────────────────────────────────────────────────────────

    pub fn register_handler(&self) -> auth::RegisterHandler {
        auth::RegisterHandler::new(
            self.repos.users.clone(),
            self.repos.otps.clone(),
            self.services.hasher.clone(),
            self.notifier(),
            self.settings.otp_ttl_minutes,
        )
    }

    pub fn verify_email_handler(&self) -> auth::VerifyEmailHandler {
        auth::VerifyEmailHandler::new(
            self.repos.users.clone(),
            self.repos.otps.clone(),
            self.services.tokens.clone(),
            self.notifier(),
            self.settings.otp_max_attempts,
        )
    }

    pub fn send_otp_handler(&self) -> auth::SendOtpHandler {
        auth::SendOtpHandler::new(
            self.repos.users.clone(),
            self.repos.otps.clone(),
            self.notifier(),
            self.settings.otp_ttl_minutes,
        )
    }

    pub fn login_handler(&self) -> auth::LoginHandler {
        auth::LoginHandler::new(
            self.repos.users.clone(),
            self.services.hasher.clone(),
            self.services.tokens.clone(),
        )
    }

    pub fn reset_password_handler(&self) -> auth::ResetPasswordHandler {
        auth::ResetPasswordHandler::new(
            self.repos.users.clone(),
            self.repos.otps.clone(),
            self.services.hasher.clone(),
            self.settings.otp_max_attempts,
        )
    }

    pub fn update_profile_handler(&self) -> auth::UpdateProfileHandler {
        auth::UpdateProfileHandler::new(self.repos.users.clone())
    }

    pub fn change_password_handler(&self) -> auth::ChangePasswordHandler {
        auth::ChangePasswordHandler::new(self.repos.users.clone(), self.services.hasher.clone())
    }

    pub fn delete_account_handler(&self) -> auth::DeleteAccountHandler {
        auth::DeleteAccountHandler::new(self.repos.users.clone(), self.services.hasher.clone())
    }

    // ── properties ──────────────────────────────────────────────────────────────

    pub fn search_properties_handler(&self) -> property::SearchPropertiesHandler {
        property::SearchPropertiesHandler::new(self.repos.properties.clone())
    }

    pub fn get_property_handler(&self) -> property::GetPropertyHandler {
        property::GetPropertyHandler::new(self.repos.properties.clone())
    }

    pub fn create_property_handler(&self) -> property::CreatePropertyHandler {
        property::CreatePropertyHandler::new(
            self.repos.properties.clone(),
            self.repos.subscriptions.clone(),
        )
    }

    pub fn update_property_handler(&self) -> property::UpdatePropertyHandler {
        property::UpdatePropertyHandler::new(self.repos.properties.clone())
    }

    pub fn change_property_status_handler(&self) -> property::ChangePropertyStatusHandler {
        property::ChangePropertyStatusHandler::new(self.repos.properties.clone())
    }

    pub fn delete_property_handler(&self) -> property::DeletePropertyHandler {
        property::DeletePropertyHandler::new(self.repos.properties.clone())
    }

    pub fn moderate_property_handler(&self) -> property::ModeratePropertyHandler {
        property::ModeratePropertyHandler::new(self.repos.properties.clone())
    }

    // ── site visits ─────────────────────────────────────────────────────────────

    pub fn request_visit_handler(&self) -> booking::RequestVisitHandler {
        booking::RequestVisitHandler::new(
            self.repos.bookings.clone(),
            self.repos.properties.clone(),
            self.repos.users.clone(),
            self.notifier(),
        )
    }

    pub fn update_booking_status_handler(&self) -> booking::UpdateBookingStatusHandler {
        booking::UpdateBookingStatusHandler::new(
            self.repos.bookings.clone(),
            self.repos.properties.clone(),
            self.repos.users.clone(),
            self.notifier(),
        )
    }

    pub fn get_booking_handler(&self) -> booking::GetBookingHandler {
        booking::GetBookingHandler::new(self.repos.bookings.clone())
    }

    // ── subscriptions ───────────────────────────────────────────────────────────

    pub fn create_subscription_order_handler(&self) -> subscription::CreateSubscriptionOrderHandler {
        subscription::CreateSubscriptionOrderHandler::new(
            self.repos.subscriptions.clone(),
            self.services.gateway.clone(),
        )
    }

    pub fn verify_subscription_payment_handler(
        &self,
    ) -> subscription::VerifySubscriptionPaymentHandler {
        subscription::VerifySubscriptionPaymentHandler::new(
            self.repos.subscriptions.clone(),
            self.repos.users.clone(),
            self.services.gateway.clone(),
            self.notifier(),
        )
    }

    pub fn get_entitlement_handler(&self) -> subscription::GetEntitlementHandler {
        subscription::GetEntitlementHandler::new(self.repos.subscriptions.clone())
    }

    pub fn cancel_subscription_handler(&self) -> subscription::CancelSubscriptionHandler {
        subscription::CancelSubscriptionHandler::new(self.repos.subscriptions.clone())
    }

    pub fn payment_webhook_handler(&self) -> subscription::HandlePaymentWebhookHandler {
        subscription::HandlePaymentWebhookHandler::new(
            self.repos.subscriptions.clone(),
            self.repos.reservations.clone(),
            self.repos.listings.clone(),
            self.repos.users.clone(),
            self.services.gateway.clone(),
            self.notifier(),
        )
    }

    // ── live grouping ───────────────────────────────────────────────────────────

    pub fn lock_unit_handler(&self) -> live_group::LockUnitHandler {
        live_group::LockUnitHandler::new(self.repos.units.clone(), self.settings.lock_policy)
    }

    pub fn release_unit_handler(&self) -> live_group::ReleaseUnitHandler {
        live_group::ReleaseUnitHandler::new(self.repos.units.clone())
    }

    pub fn book_unit_handler(&self) -> live_group::BookUnitHandler {
        live_group::BookUnitHandler::new(
            self.repos.units.clone(),
            self.repos.projects.clone(),
            self.repos.users.clone(),
            self.notifier(),
        )
    }

    pub fn cancel_live_booking_handler(&self) -> live_group::CancelLiveBookingHandler {
        live_group::CancelLiveBookingHandler::new(self.repos.units.clone())
    }

    pub fn change_project_status_handler(&self) -> live_group::ChangeProjectStatusHandler {
        live_group::ChangeProjectStatusHandler::new(self.repos.projects.clone())
    }

    pub fn create_project_handler(&self) -> live_group::CreateProjectHandler {
        live_group::CreateProjectHandler::new(self.repos.projects.clone())
    }

    pub fn update_project_handler(&self) -> live_group::UpdateProjectHandler {
        live_group::UpdateProjectHandler::new(self.repos.projects.clone())
    }

    pub fn delete_project_handler(&self) -> live_group::DeleteProjectHandler {
        live_group::DeleteProjectHandler::new(self.repos.projects.clone())
    }

    pub fn get_project_handler(&self) -> live_group::GetProjectHandler {
        live_group::GetProjectHandler::new(self.repos.projects.clone())
    }

    pub fn list_projects_handler(&self) -> live_group::ListProjectsHandler {
        live_group::ListProjectsHandler::new(self.repos.projects.clone())
    }

    pub fn list_project_bookings_handler(&self) -> live_group::ListProjectBookingsHandler {
        live_group::ListProjectBookingsHandler::new(
            self.repos.projects.clone(),
            self.repos.units.clone(),
        )
    }

    pub fn my_live_group_handler(&self) -> live_group::MyLiveGroupHandler {
        live_group::MyLiveGroupHandler::new(self.repos.units.clone())
    }

    pub fn sync_hierarchy_handler(&self) -> live_group::SyncHierarchyHandler {
        live_group::SyncHierarchyHandler::new(self.repos.projects.clone())
    }

    // ── short stay ──────────────────────────────────────────────────────────────

    pub fn create_stay_listing_handler(&self) -> short_stay::CreateStayListingHandler {
        short_stay::CreateStayListingHandler::new(self.repos.listings.clone())
    }

    pub fn update_stay_listing_handler(&self) -> short_stay::UpdateStayListingHandler {
        short_stay::UpdateStayListingHandler::new(self.repos.listings.clone())
    }

    pub fn delete_stay_listing_handler(&self) -> short_stay::DeleteStayListingHandler {
        short_stay::DeleteStayListingHandler::new(self.repos.listings.clone())
    }

    pub fn get_stay_listing_handler(&self) -> short_stay::GetStayListingHandler {
        short_stay::GetStayListingHandler::new(self.repos.listings.clone())
    }

    pub fn availability_handler(&self) -> short_stay::GetAvailabilityHandler {
        short_stay::GetAvailabilityHandler::new(
            self.repos.listings.clone(),
            self.repos.reservations.clone(),
        )
    }

    pub fn quote_stay_handler(&self) -> short_stay::QuoteStayHandler {
        short_stay::QuoteStayHandler::new(self.repos.listings.clone())
    }

    pub fn reserve_stay_handler(&self) -> short_stay::ReserveStayHandler {
        short_stay::ReserveStayHandler::new(
            self.repos.listings.clone(),
            self.repos.reservations.clone(),
            self.settings.hold_minutes,
            self.settings.max_advance_days,
        )
    }

    pub fn start_stay_payment_handler(&self) -> short_stay::StartStayPaymentHandler {
        short_stay::StartStayPaymentHandler::new(
            self.repos.reservations.clone(),
            self.services.gateway.clone(),
        )
    }

    pub fn confirm_stay_payment_handler(&self) -> short_stay::ConfirmStayPaymentHandler {
        short_stay::ConfirmStayPaymentHandler::new(
            self.repos.reservations.clone(),
            self.repos.listings.clone(),
            self.repos.users.clone(),
            self.services.gateway.clone(),
            self.notifier(),
        )
    }

    pub fn cancel_reservation_handler(&self) -> short_stay::CancelReservationHandler {
        short_stay::CancelReservationHandler::new(
            self.repos.reservations.clone(),
            self.repos.listings.clone(),
            self.repos.users.clone(),
            self.notifier(),
        )
    }

    pub fn complete_reservation_handler(&self) -> short_stay::CompleteReservationHandler {
        short_stay::CompleteReservationHandler::new(self.repos.reservations.clone())
    }

    // ── wishlists and reviews ───────────────────────────────────────────────────

    pub fn add_to_wishlist_handler(&self) -> engagement::AddToWishlistHandler {
        engagement::AddToWishlistHandler::new(
            self.repos.wishlists.clone(),
            self.repos.properties.clone(),
        )
    }

    pub fn remove_from_wishlist_handler(&self) -> engagement::RemoveFromWishlistHandler {
        engagement::RemoveFromWishlistHandler::new(self.repos.wishlists.clone())
    }

    pub fn list_wishlist_handler(&self) -> engagement::ListWishlistHandler {
        engagement::ListWishlistHandler::new(self.repos.wishlists.clone())
    }

    pub fn wishlist_ids_handler(&self) -> engagement::WishlistIdsHandler {
        engagement::WishlistIdsHandler::new(self.repos.wishlists.clone())
    }

    pub fn create_review_handler(&self) -> engagement::CreateReviewHandler {
        engagement::CreateReviewHandler::new(
            self.repos.reviews.clone(),
            self.repos.properties.clone(),
        )
    }

    pub fn update_review_handler(&self) -> engagement::UpdateReviewHandler {
        engagement::UpdateReviewHandler::new(self.repos.reviews.clone())
    }

    pub fn delete_review_handler(&self) -> engagement::DeleteReviewHandler {
        engagement::DeleteReviewHandler::new(self.repos.reviews.clone())
    }

    pub fn list_reviews_handler(&self) -> engagement::ListReviewsHandler {
        engagement::ListReviewsHandler::new(self.repos.reviews.clone())
    }

    // ── chat ────────────────────────────────────────────────────────────────────

    pub fn start_conversation_handler(&self) -> chat::StartConversationHandler {
        chat::StartConversationHandler::new(self.repos.chats.clone(), self.repos.properties.clone())
    }

    pub fn get_conversation_handler(&self) -> chat::GetConversationHandler {
        chat::GetConversationHandler::new(self.repos.chats.clone())
    }

    pub fn list_conversations_handler(&self) -> chat::ListConversationsHandler {
        chat::ListConversationsHandler::new(self.repos.chats.clone())
    }

    pub fn list_messages_handler(&self) -> chat::ListMessagesHandler {
        chat::ListMessagesHandler::new(self.repos.chats.clone())
    }

    pub fn send_message_handler(&self) -> chat::SendMessageHandler {
        chat::SendMessageHandler::new(self.repos.chats.clone(), self.broadcaster())
    }

    pub fn mark_read_handler(&self) -> chat::MarkReadHandler {
        chat::MarkReadHandler::new(self.repos.chats.clone(), self.broadcaster())
    }

    // ── marketing ───────────────────────────────────────────────────────────────

    pub fn submit_lead_handler(&self) -> marketing::SubmitLeadHandler {
        marketing::SubmitLeadHandler::new(self.repos.leads.clone(), self.notifier())
    }

    pub fn newsletter_handler(&self) -> marketing::NewsletterHandler {
        marketing::NewsletterHandler::new(self.repos.leads.clone())
    }

    pub fn list_leads_handler(&self) -> marketing::ListLeadsHandler {
        marketing::ListLeadsHandler::new(self.repos.leads.clone())
    }

    pub fn update_lead_handler(&self) -> marketing::UpdateLeadHandler {
        marketing::UpdateLeadHandler::new(self.repos.leads.clone())
    }

    // ── admin ───────────────────────────────────────────────────────────────────

    pub fn dashboard_stats_handler(&self) -> admin::DashboardStatsHandler {
        admin::DashboardStatsHandler::new(self.repos.admin.clone())
    }

    pub fn list_users_handler(&self) -> admin::ListUsersHandler {
        admin::ListUsersHandler::new(self.repos.users.clone())
    }

    pub fn change_user_role_handler(&self) -> admin::ChangeUserRoleHandler {
        admin::ChangeUserRoleHandler::new(self.repos.users.clone())
    }

    pub fn delete_user_handler(&self) -> admin::DeleteUserHandler {
        admin::DeleteUserHandler::new(self.repos.users.clone())
    }

    pub fn list_properties_by_status_handler(&self) -> admin::ListPropertiesByStatusHandler {
        admin::ListPropertiesByStatusHandler::new(self.repos.properties.clone())
    }

    // ── uploads ─────────────────────────────────────────────────────────────────

    pub fn upload_images_handler(&self) -> uploads::UploadImagesHandler {
        uploads::UploadImagesHandler::new(
            self.services.storage.clone(),
            self.settings.max_upload_bytes,
        )
    }

    pub fn delete_image_handler(&self) -> uploads::DeleteImageHandler {
        uploads::DeleteImageHandler::new(self.services.storage.clone())
    }
}
