//! Demo cookie-shop commands served by the daemon.
//!
//! Three orders are available, each backed by the same immutable
//! [`CookieStore`]. [`CookieDiscovery`] hands their handlers to the registry
//! at startup.

mod orders;
mod store;

use std::sync::Arc;

use commander::{HandlerBox, HandlerDescriptor, HandlerDiscovery};

pub use orders::{
    EmptyStore, FirstAvailableGingerCookieOrder, GingerCookieOrderHandler,
    GingerCookieOrderResponse, MAX_SUGAR_LIMIT_GRAMS, MaxSugarOrder, MaxSugarOrderHandler,
    MaxSugarOrderResponse, SugarComaCookieOrder, SugarComaCookieOrderHandler,
    SugarComaCookieOrderResponse,
};
pub use store::{Cookie, CookieStore};

/// Discovery source yielding the cookie order handlers.
#[derive(Debug, Clone)]
pub struct CookieDiscovery {
    store: Arc<CookieStore>,
}

impl CookieDiscovery {
    /// Serves orders from `store`.
    #[must_use]
    pub const fn new(store: Arc<CookieStore>) -> Self {
        Self { store }
    }

    /// Serves orders from [`CookieStore::standard`].
    #[must_use]
    pub fn standard() -> Self {
        Self::new(Arc::new(CookieStore::standard()))
    }

    /// Store shared by every handler.
    #[must_use]
    pub fn store(&self) -> &CookieStore {
        &self.store
    }
}

impl HandlerDiscovery for CookieDiscovery {
    fn discover(&self) -> Option<Vec<HandlerBox>> {
        Some(vec![
            HandlerDescriptor::with_defaults(SugarComaCookieOrderHandler::new(Arc::clone(
                &self.store,
            )))
            .into(),
            HandlerDescriptor::with_defaults(GingerCookieOrderHandler::new(Arc::clone(
                &self.store,
            )))
            .into(),
            HandlerDescriptor::with_defaults(MaxSugarOrderHandler::new(Arc::clone(&self.store)))
                .into(),
        ])
    }
}
