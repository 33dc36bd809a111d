//! Sources of handlers for bulk registration at startup.

use crate::handler::HandlerBox;

/// Supplies the handlers an application wants registered.
///
/// Returning `None` means the source found nothing to offer; the registry
/// logs a warning and carries on empty.
pub trait HandlerDiscovery: Send + Sync {
    /// Yields the handlers to register, in registration order.
    fn discover(&self) -> Option<Vec<HandlerBox>>;
}

/// Discovery backed by a fixed list of handlers.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    handlers: Vec<HandlerBox>,
}

impl StaticDiscovery {
    /// Creates a discovery source yielding `handlers`.
    #[must_use]
    pub const fn new(handlers: Vec<HandlerBox>) -> Self {
        Self { handlers }
    }

    /// Appends a handler to the list.
    #[must_use]
    pub fn with(mut self, handler: impl Into<HandlerBox>) -> Self {
        self.handlers.push(handler.into());
        self
    }
}

impl HandlerDiscovery for StaticDiscovery {
    fn discover(&self) -> Option<Vec<HandlerBox>> {
        (!self.handlers.is_empty()).then(|| self.handlers.clone())
    }
}

impl<F> HandlerDiscovery for F
where
    F: Fn() -> Option<Vec<HandlerBox>> + Send + Sync,
{
    fn discover(&self) -> Option<Vec<HandlerBox>> {
        self()
    }
}
