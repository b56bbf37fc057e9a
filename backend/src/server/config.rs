//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use chrono::Duration;
use mockable::{Clock, DefaultClock};

use crate::domain::DEFAULT_RECOMPUTE_ATTEMPTS;
use crate::outbound::credentials::{Argon2PasswordHasher, SigningSecret};
use crate::outbound::persistence::DbPool;

const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Builder-style configuration for creating the HTTP server.
///
/// Without a database pool every repository is served by one shared
/// in-memory store.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) secret: SigningSecret,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) token_ttl: Duration,
    pub(crate) recompute_attempts: NonZeroU32,
    pub(crate) default_page_limit: u32,
    pub(crate) hasher: Argon2PasswordHasher,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ServerConfig {
    /// Configuration with default TTL, attempts, page size and system clock.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, secret: SigningSecret) -> Self {
        Self {
            bind_addr,
            secret,
            db_pool: None,
            token_ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            recompute_attempts: DEFAULT_RECOMPUTE_ATTEMPTS,
            default_page_limit: pagination::DEFAULT_LIMIT,
            hasher: Argon2PasswordHasher::new(),
            clock: Arc::new(DefaultClock),
        }
    }

    /// Serve the repositories from PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Lifetime of issued tokens.
    #[must_use]
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Attempts per rating refresh.
    #[must_use]
    pub fn with_recompute_attempts(mut self, attempts: NonZeroU32) -> Self {
        self.recompute_attempts = attempts;
        self
    }

    /// Page size for listings that omit `limit`.
    #[must_use]
    pub fn with_default_page_limit(mut self, limit: u32) -> Self {
        self.default_page_limit = limit;
        self
    }

    /// Replace the password hasher, e.g. with a cheaper cost in tests.
    #[must_use]
    pub fn with_password_hasher(mut self, hasher: Argon2PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Replace the clock used for timestamps and token expiry.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Whether PostgreSQL backs the repositories.
    #[must_use]
    pub fn uses_database(&self) -> bool {
        self.db_pool.is_some()
    }
}
