//! Process settings loaded via OrthoConfig.
//!
//! Every key can come from a `--kebab-case` flag or a `BOOKSHELF_*`
//! environment variable, e.g. `BOOKSHELF_DATABASE_URL`.

use std::net::SocketAddr;
use std::num::NonZeroU32;

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings failures detected after loading.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("bind address `{value}` is not a socket address: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("token TTL must be at least one hour")]
    TokenTtl,
}

/// Runtime configuration for the bookshelf server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKSHELF")]
pub struct Settings {
    /// Listen address, `host:port`.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Lifetime of issued bearer tokens.
    #[ortho_config(default = 24)]
    pub token_ttl_hours: u32,
    /// Recompute attempts per rating refresh before giving up.
    #[ortho_config(default = 2)]
    pub rating_recompute_attempts: u32,
    /// Page size for listings that omit `limit`.
    #[ortho_config(default = 5)]
    pub default_page_limit: u32,
}

impl Settings {
    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the configured value does not
    /// parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Token lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::TokenTtl`] for a zero TTL.
    pub fn token_ttl(&self) -> Result<Duration, SettingsError> {
        match self.token_ttl_hours {
            0 => Err(SettingsError::TokenTtl),
            hours => Ok(Duration::hours(i64::from(hours))),
        }
    }

    /// Recompute attempts; a configured zero is raised to one.
    pub fn rating_recompute_attempts(&self) -> NonZeroU32 {
        NonZeroU32::new(self.rating_recompute_attempts).unwrap_or(NonZeroU32::MIN)
    }

    /// Listing page size used when a request omits `limit`.
    pub fn default_page_limit(&self) -> u32 {
        self.default_page_limit.clamp(1, pagination::MAX_LIMIT)
    }
}
