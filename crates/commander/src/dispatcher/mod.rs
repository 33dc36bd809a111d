//! Single entry point turning a raw JSON payload into a JSON response.
//!
//! Dispatch runs in two passes over the payload. The first pass decodes only
//! the `type` discriminator ([`Envelope::decode`]) so the registry can resolve
//! a handler; the second pass, performed by the resolved [`HandlerBox`],
//! deserialises the full payload into the handler's own command type,
//! validates it, executes the handler, and serialises the response.
//!
//! Every failure is returned as a [`DispatchError`] variant and logged under
//! the dispatch target; nothing panics and the registry is never mutated.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalogue::Catalogue;
use crate::envelope::Envelope;
use crate::error::DispatchError;
use crate::handler::HandlerBox;
use crate::registry::HandlerRegistry;

/// Tracing target for dispatch events.
pub const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Routes payloads to registered handlers.
///
/// Cloning is cheap and clones share the registry, so one dispatcher can be
/// handed to every worker thread.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
}

impl Dispatcher {
    /// Creates a dispatcher over a shared registry.
    #[must_use]
    pub const fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    /// Registry consulted for every payload.
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Dispatches one payload and returns the serialised response.
    ///
    /// A trailing newline or other trailing whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MalformedEnvelope`] when the discriminator
    /// cannot be read, [`DispatchError::UnknownCommandType`] when no handler
    /// is registered for it, and the errors of [`HandlerBox::invoke`] for the
    /// typed stages.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use commander::{DispatchError, Dispatcher, HandlerRegistry};
    ///
    /// let dispatcher = Dispatcher::new(Arc::new(HandlerRegistry::new()));
    /// let result = dispatcher.dispatch(r#"{"type":"DoesNotExist"}"#);
    /// assert!(matches!(result, Err(DispatchError::UnknownCommandType { .. })));
    /// ```
    pub fn dispatch(&self, payload: impl AsRef<[u8]>) -> Result<String, DispatchError> {
        self.try_dispatch(payload.as_ref()).inspect_err(|error| {
            if error.is_client_error() {
                debug!(
                    target: DISPATCH_TARGET,
                    code = error.code(),
                    command_type = error.command_type(),
                    %error,
                    "request rejected"
                );
            } else {
                warn!(
                    target: DISPATCH_TARGET,
                    code = error.code(),
                    command_type = error.command_type(),
                    %error,
                    "dispatch failed"
                );
            }
        })
    }

    /// Resolves the handler a payload would be routed to without running it.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MalformedEnvelope`] or
    /// [`DispatchError::UnknownCommandType`].
    pub fn resolve(&self, payload: impl AsRef<[u8]>) -> Result<HandlerBox, DispatchError> {
        let envelope = Envelope::decode(payload.as_ref())?;
        self.registry
            .lookup(envelope.command_type())
            .ok_or_else(|| DispatchError::unknown_command_type(envelope.into_command_type()))
    }

    /// Describes the commands currently registered.
    #[must_use]
    pub fn catalogue(&self) -> Catalogue {
        Catalogue::from_registry(&self.registry)
    }

    fn try_dispatch(&self, payload: &[u8]) -> Result<String, DispatchError> {
        let envelope = Envelope::decode(payload)?;
        let command_type = envelope.command_type();
        let handler = self
            .registry
            .lookup(command_type)
            .ok_or_else(|| DispatchError::unknown_command_type(command_type))?;

        debug!(
            target: DISPATCH_TARGET,
            command_type,
            handler = handler.handler_type(),
            "dispatching command"
        );
        handler.invoke(command_type, payload)
    }
}

impl From<HandlerRegistry> for Dispatcher {
    fn from(registry: HandlerRegistry) -> Self {
        Self::new(Arc::new(registry))
    }
}
