//! Backend entry-point: loads settings, wires adapters, and serves the
//! REST API with its OpenAPI docs.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use atelier::domain::ports::DomainEventPublisher;
use atelier::inbound::http::auth_config::{BuildMode, auth_settings_from_env};
use atelier::inbound::http::health::HealthState;
use atelier::outbound::events::TracingEventPublisher;
use atelier::settings::AppSettings;

use server::{ServerConfig, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let auth = auth_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let events: Arc<dyn DomainEventPublisher> = Arc::new(TracingEventPublisher);
    #[cfg(feature = "metrics")]
    let prometheus = server::build_prometheus();
    #[cfg(feature = "metrics")]
    let events = server::count_events(events, prometheus.as_ref());

    let http_state = build_http_state(&settings, auth, events).await?;
    let config = ServerConfig::new(bind_addr, http_state);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(prometheus);

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting HTTP server");
    create_server(health_state, config)?.await
}
