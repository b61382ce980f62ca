//! EstateHub API server.
//!
//! Loads configuration from the environment, connects PostgreSQL, wires the
//! adapters into [`AppState`] and serves the REST API until SIGINT/SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use estatehub::adapters::auth::{Argon2PasswordHasher, JwtTokenService};
use estatehub::adapters::cloudinary::{CloudinaryStorage, MockMediaStorage};
use estatehub::adapters::email::build_email_sender;
use estatehub::adapters::http::{
    api_router, set_verbose_errors, ApiSettings, AppState, Repositories, Services,
};
use estatehub::adapters::postgres;
use estatehub::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitConfig, RedisRateLimiter};
use estatehub::adapters::razorpay::{MockPaymentGateway, RazorpayGateway};
use estatehub::application::{MaintenanceSweeper, Notifier};
use estatehub::config::{AppConfig, PaymentProvider, StorageProvider};
use estatehub::domain::notification::Branding;
use estatehub::ports::{MediaStorage, PaymentGateway, RateLimiter};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);
    set_verbose_errors(config.features.verbose_errors);

    tracing::info!(
        environment = ?config.server.environment,
        "Starting EstateHub API"
    );

    let pool = postgres::connect(&config.database).await?;
    tracing::info!("Connected to PostgreSQL");

    let services = build_services(&config).await?;
    let repos = Repositories::postgres(pool.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = MaintenanceSweeper::new(
        repos.units.clone(),
        repos.reservations.clone(),
        repos.subscriptions.clone(),
        config.live_group.sweep_interval(),
    );
    let sweeper_task = tokio::spawn(async move { sweeper.run(shutdown_rx).await });

    let state = AppState::new(repos, services, ApiSettings::from_config(&config))
        .with_database(pool.clone());
    let app = api_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped, draining background tasks");
    let _ = shutdown_tx.send(true);
    if let Err(e) = sweeper_task.await {
        tracing::warn!(error = %e, "Maintenance sweeper task failed");
    }
    pool.close().await;

    Ok(())
}

/// JSON lines in production, human-readable output elsewhere.
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone()));
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn build_services(config: &AppConfig) -> Result<Services, BoxError> {
    let tokens = Arc::new(JwtTokenService::new(
        &config.auth.jwt_secret,
        config.auth.issuer.clone(),
        config.auth.token_ttl_hours,
    ));

    let sender = build_email_sender(&config.email)?;
    let branding = Branding {
        frontend_url: config.email.frontend_url.clone(),
        ..Branding::default()
    };
    let notifier =
        Notifier::new(sender, branding).with_admin_email(config.email.admin_email.clone());

    let gateway: Arc<dyn PaymentGateway> = match config.payment.provider {
        PaymentProvider::Razorpay => Arc::new(RazorpayGateway::new(&config.payment)?),
        PaymentProvider::Mock => {
            tracing::warn!("Using mock payment gateway; signatures are not checked");
            Arc::new(MockPaymentGateway::new())
        }
    };

    let storage: Arc<dyn MediaStorage> = match config.storage.provider {
        StorageProvider::Cloudinary => Arc::new(CloudinaryStorage::new(&config.storage)?),
        StorageProvider::Mock => Arc::new(MockMediaStorage::new()),
    };

    let rate_limiter: Arc<dyn RateLimiter> = match config.redis.url() {
        Some(url) => {
            let client = redis::Client::open(url)?;
            let conn = client.get_multiplexed_async_connection().await?;
            tracing::info!("Rate limiting backed by Redis");
            Arc::new(RedisRateLimiter::new(conn, RateLimitConfig::default()))
        }
        None => {
            tracing::info!("Rate limiting in-process; limits are per instance");
            Arc::new(InMemoryRateLimiter::with_defaults())
        }
    };

    Ok(Services {
        sessions: tokens.clone(),
        tokens,
        hasher: Arc::new(Argon2PasswordHasher::new()),
        gateway,
        storage,
        rate_limiter,
        notifier,
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
