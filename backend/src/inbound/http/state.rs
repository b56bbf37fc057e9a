//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see domain ports, so they
//! can be exercised with mocks and no I/O.

use std::sync::Arc;

use pagination::{DEFAULT_LIMIT, MAX_LIMIT};

use crate::domain::ports::{
    AccountCommand, BookCommand, BookQuery, CredentialService, ProfileQuery, ReviewCommand,
    ReviewQuery,
};

/// Port implementations required by the handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub profiles: Arc<dyn ProfileQuery>,
    pub books: Arc<dyn BookCommand>,
    pub books_query: Arc<dyn BookQuery>,
    pub reviews: Arc<dyn ReviewCommand>,
    pub reviews_query: Arc<dyn ReviewQuery>,
    pub credentials: Arc<dyn CredentialService>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub profiles: Arc<dyn ProfileQuery>,
    pub books: Arc<dyn BookCommand>,
    pub books_query: Arc<dyn BookQuery>,
    pub reviews: Arc<dyn ReviewCommand>,
    pub reviews_query: Arc<dyn ReviewQuery>,
    pub credentials: Arc<dyn CredentialService>,
    default_page_limit: u32,
}

impl HttpState {
    /// Build state with the default listing page size.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            profiles,
            books,
            books_query,
            reviews,
            reviews_query,
            credentials,
        } = ports;
        Self {
            accounts,
            profiles,
            books,
            books_query,
            reviews,
            reviews_query,
            credentials,
            default_page_limit: DEFAULT_LIMIT,
        }
    }

    /// Override the page size used when a listing request omits `limit`.
    #[must_use]
    pub fn with_default_page_limit(mut self, limit: u32) -> Self {
        self.default_page_limit = limit.clamp(1, MAX_LIMIT);
        self
    }

    /// Page size applied when a listing request omits `limit`.
    pub fn default_page_limit(&self) -> u32 {
        self.default_page_limit
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
