//! Foodgram API server: loads settings, prepares the database and serves the
//! REST API with health probes and, in debug builds, Swagger UI.

mod server;

use std::ffi::OsString;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use foodgram::inbound::http::health::HealthState;
use foodgram::inbound::http::session_config::{BuildMode, session_settings};
use foodgram::outbound::persistence::{DbPool, run_migrations};
use server::{AppSettings, ServerConfig, create_server};

fn load_settings() -> Result<AppSettings> {
    let args: Vec<OsString> = std::env::args_os().collect();
    AppSettings::load_from_iter(args).map_err(|error| eyre!("failed to load settings: {error}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings()?;
    let bind_addr = settings.bind_addr()?;
    let session = session_settings(
        &settings.session_toggles(),
        BuildMode::from_debug_assertions(),
    )
    .wrap_err("invalid session configuration")?;
    let pool_config = settings.pool_config()?;

    if settings.run_migrations {
        run_migrations(pool_config.database_url())
            .await
            .wrap_err("failed to apply migrations")?;
    }
    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to build the connection pool")?;
    if settings.login_password.is_none() {
        warn!("login_password not set; every login will be refused");
    }

    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        pool,
    )
    .with_login_password(settings.login_password());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), &config)?;
    health_state.mark_ready();
    info!(%bind_addr, "foodgram listening");

    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}
