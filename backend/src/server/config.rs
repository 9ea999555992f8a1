//! Application settings and the HTTP server configuration built from them.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use foodgram::inbound::http::session_config::SessionToggles;
use foodgram::outbound::persistence::{DbPool, PoolConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Settings loaded from `FOODGRAM_*` environment variables, CLI flags and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FOODGRAM")]
pub struct AppSettings {
    /// Listen address, `host:port`.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub db_max_connections: Option<u32>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
    /// Shared password accepted by the login endpoint.
    pub login_password: Option<String>,
    pub session_key_file: Option<PathBuf>,
    pub cookie_secure: Option<bool>,
    pub session_same_site: Option<String>,
    pub session_allow_ephemeral: Option<bool>,
}

/// Failures turning [`AppSettings`] into runtime values.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("database_url is required")]
    MissingDatabaseUrl,
}

impl AppSettings {
    /// Parsed listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Pool settings for the configured database.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let url = self
            .database_url
            .as_deref()
            .ok_or(SettingsError::MissingDatabaseUrl)?;
        Ok(PoolConfig::new(url).with_max_size(
            self.db_max_connections
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
        ))
    }

    /// Session toggles for [`foodgram::inbound::http::session_config`].
    #[must_use]
    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self.session_key_file.clone(),
            cookie_secure: self.cookie_secure,
            same_site: self.session_same_site.clone(),
            allow_ephemeral: self.session_allow_ephemeral,
        }
    }

    /// The login password, wiped from memory when dropped.
    #[must_use]
    pub fn login_password(&self) -> Option<Zeroizing<String>> {
        self.login_password.clone().map(Zeroizing::new)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) login_password: Option<Zeroizing<String>>,
}

impl ServerConfig {
    /// Construct a server configuration around a connection pool.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        db_pool: DbPool,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool,
            login_password: None,
        }
    }

    /// Set the shared login password; without one every login is refused.
    #[must_use]
    pub fn with_login_password(mut self, password: Option<Zeroizing<String>>) -> Self {
        self.login_password = password;
        self
    }
}
