//! Builders wiring driven adapters into the HTTP state.
//!
//! PostgreSQL and S3 are used when configured; otherwise the in-memory
//! adapters stand in so the API runs without infrastructure.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use atelier::domain::AuthService;
use atelier::domain::ports::{
    AccessTokenVerifier, AppointmentRepository, BookingRepository, DomainEventPublisher,
    ImageStorage, LoginService, ProductRepository,
};
use atelier::domain::{Clutch, Dress};
use atelier::inbound::http::auth_config::AuthSettings;
use atelier::inbound::http::state::{DrivenAdapters, HttpState, HttpStatePorts};
use atelier::outbound::memory::{
    InMemoryAppointmentRepository, InMemoryBookingRepository, InMemoryClutchRepository,
    InMemoryDressRepository,
};
use atelier::outbound::persistence::{
    DbPool, DieselAppointmentRepository, DieselBookingRepository, DieselClutchRepository,
    DieselDressRepository, PoolConfig, run_migrations,
};
use atelier::outbound::storage::{InMemoryImageStorage, S3ImageStorage};
use atelier::outbound::token::JwtTokenCodec;
use atelier::settings::AppSettings;

/// Adapters shared by every repository flavour.
struct SharedAdapters {
    storage: Arc<dyn ImageStorage>,
    events: Arc<dyn DomainEventPublisher>,
    clock: Arc<dyn Clock>,
    login: Arc<dyn LoginService>,
    tokens: Arc<dyn AccessTokenVerifier>,
}

/// Login and verification share one service so tokens round-trip.
fn build_auth(
    settings: &AppSettings,
    auth: AuthSettings,
    clock: Arc<dyn Clock>,
) -> (Arc<dyn LoginService>, Arc<dyn AccessTokenVerifier>) {
    let codec = Arc::new(JwtTokenCodec::new(&auth.jwt_secret));
    let service =
        Arc::new(AuthService::new(auth.users, codec, clock).with_token_ttl(settings.token_ttl()));
    (
        service.clone() as Arc<dyn LoginService>,
        service as Arc<dyn AccessTokenVerifier>,
    )
}

async fn build_storage(settings: &AppSettings) -> Arc<dyn ImageStorage> {
    match settings.s3() {
        Some(config) => {
            info!(bucket = %config.bucket, "using S3 image storage");
            Arc::new(S3ImageStorage::connect(&config).await)
        }
        None => {
            warn!("ATELIER_S3_BUCKET not set; images are kept in memory");
            Arc::new(InMemoryImageStorage::new())
        }
    }
}

fn ports_over<A, B, D, C>(
    appointments: A,
    bookings: B,
    dresses: D,
    clutches: C,
    shared: SharedAdapters,
    settings: &AppSettings,
) -> HttpStatePorts
where
    A: AppointmentRepository + 'static,
    B: BookingRepository + 'static,
    D: ProductRepository<Dress> + 'static,
    C: ProductRepository<Clutch> + 'static,
{
    HttpStatePorts::from_adapters(
        DrivenAdapters {
            appointments: Arc::new(appointments),
            bookings: Arc::new(bookings),
            dresses: Arc::new(dresses),
            clutches: Arc::new(clutches),
            storage: shared.storage,
            events: shared.events,
            clock: shared.clock,
            presign_ttl: settings.presign_ttl(),
        },
        shared.login,
        shared.tokens,
    )
}

/// Run migrations and open the pool for `database_url`.
async fn connect_database(settings: &AppSettings, database_url: &str) -> std::io::Result<DbPool> {
    run_migrations(database_url)
        .await
        .map_err(|err| std::io::Error::other(format!("database migration failed: {err}")))?;
    DbPool::new(PoolConfig::new(database_url).with_max_size(settings.db_max_connections()))
        .await
        .map_err(|err| std::io::Error::other(format!("database pool failed: {err}")))
}

/// Build the shared HTTP state from settings, falling back to in-memory
/// adapters for whatever is not configured.
///
/// # Errors
///
/// Returns [`std::io::Error`] when migrations or the database pool fail.
pub(crate) async fn build_http_state(
    settings: &AppSettings,
    auth: AuthSettings,
    events: Arc<dyn DomainEventPublisher>,
) -> std::io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let cookie_secure = auth.cookie_secure;
    let (login, tokens) = build_auth(settings, auth, Arc::clone(&clock));
    let shared = SharedAdapters {
        storage: build_storage(settings).await,
        events,
        clock,
        login,
        tokens,
    };

    let ports = match settings.database_url.as_deref() {
        Some(url) => {
            let pool = connect_database(settings, url).await?;
            info!("using PostgreSQL repositories");
            ports_over(
                DieselAppointmentRepository::new(pool.clone()),
                DieselBookingRepository::new(pool.clone()),
                DieselDressRepository::new(pool.clone()),
                DieselClutchRepository::new(pool),
                shared,
                settings,
            )
        }
        None => {
            warn!("ATELIER_DATABASE_URL not set; data lives in memory until shutdown");
            ports_over(
                InMemoryAppointmentRepository::new(),
                InMemoryBookingRepository::new(),
                InMemoryDressRepository::new(),
                InMemoryClutchRepository::new(),
                shared,
                settings,
            )
        }
    };

    Ok(web::Data::new(
        HttpState::new(ports)
            .with_cookie_secure(cookie_secure)
            .with_default_page_size(settings.page_size()),
    ))
}
