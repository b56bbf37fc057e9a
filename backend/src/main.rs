//! Backend entry-point: loads settings and the signing secret, prepares the
//! store, then serves the REST API.

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bookshelf::inbound::http::HealthState;
use bookshelf::outbound::credentials::{BuildMode, signing_secret_from_env};
use bookshelf::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use bookshelf::server::{ServerConfig, create_server};
use bookshelf::settings::Settings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::load().map_err(|e| io::Error::other(format!("settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let token_ttl = settings.token_ttl().map_err(io::Error::other)?;

    let secret = signing_secret_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    info!(fingerprint = %secret.fingerprint(), "auth secret loaded");

    let mut config = ServerConfig::new(bind_addr, secret)
        .with_token_ttl(token_ttl)
        .with_recompute_attempts(settings.rating_recompute_attempts())
        .with_default_page_limit(settings.default_page_limit());

    match settings.database_url() {
        Some(url) => {
            run_pending_migrations(url).await.map_err(io::Error::other)?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database configured; using the in-memory store"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
