//! Thread-safe store of verified handlers keyed by discriminator.
//!
//! The [`HandlerRegistry`] accepts handlers only after [`verifier::verify`]
//! succeeds and refuses a second handler for a discriminator that is already
//! bound. Reads and writes may interleave from any number of threads; a
//! lookup sees either the state before or after a concurrent registration,
//! never a partially inserted entry.
//!
//! [`verifier::verify`]: crate::verifier::verify

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::discovery::HandlerDiscovery;
use crate::error::RegistrationError;
use crate::handler::HandlerBox;

/// Tracing target for registry events.
const REGISTRY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::registry");

/// Registry of command handlers.
///
/// # Example
///
/// ```
/// use commander::{BoxError, Command, CommandHandler, HandlerBox, HandlerDescriptor, HandlerRegistry};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Deserialize, Serialize)]
/// struct Ping {}
///
/// impl Command for Ping {
///     type Response = ();
///     fn command_type(&self) -> &str { "Ping" }
/// }
///
/// struct PingHandler;
///
/// impl CommandHandler for PingHandler {
///     type Command = Ping;
///     fn compatible_type(&self) -> &str { "Ping" }
///     fn execute(&self, _command: Ping) -> Result<(), BoxError> { Ok(()) }
/// }
///
/// let registry = HandlerRegistry::new();
/// registry
///     .register(HandlerBox::new(HandlerDescriptor::with_defaults(PingHandler)))
///     .expect("registration succeeds");
/// assert!(registry.lookup("Ping").is_some());
/// assert!(registry.lookup("ping").is_none());
/// ```
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<String, HandlerBox>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from every handler a discovery source yields.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistrationError`] raised while registering the
    /// discovered handlers.
    pub fn from_discovery(discovery: &dyn HandlerDiscovery) -> Result<Self, RegistrationError> {
        let registry = Self::new();
        registry.register_all(discovery.discover())?;
        Ok(registry)
    }

    /// Verifies and stores a handler under its discriminator.
    ///
    /// # Errors
    ///
    /// Returns the verifier's error when the handler is inconsistent with its
    /// types, or [`RegistrationError::DuplicateRegistration`] when another
    /// handler already owns the discriminator. The registry is unchanged in
    /// either case.
    pub fn register(&self, handler: HandlerBox) -> Result<(), RegistrationError> {
        handler.verify()?;

        let command_type = handler.compatible_type().to_owned();
        let mut handlers = self.write();
        if let Some(existing) = handlers.get(&command_type) {
            let err = RegistrationError::DuplicateRegistration {
                command_type,
                existing: existing.handler_type(),
                rejected: handler.handler_type(),
            };
            warn!(target: REGISTRY_TARGET, error = %err, "duplicate handler rejected");
            return Err(err);
        }

        info!(
            target: REGISTRY_TARGET,
            command_type = %command_type,
            handler = handler.handler_type(),
            "handler registered"
        );
        handlers.insert(command_type, handler);
        Ok(())
    }

    /// Registers each handler in order, stopping at the first failure.
    ///
    /// Handlers registered before the failure stay registered. `None` or an
    /// empty collection logs a warning and leaves the registry unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistrationError`] encountered.
    pub fn register_all<I>(&self, handlers: Option<I>) -> Result<(), RegistrationError>
    where
        I: IntoIterator<Item = HandlerBox>,
    {
        let mut registered = 0_usize;
        for handler in handlers.into_iter().flatten() {
            self.register(handler)?;
            registered += 1;
        }
        if registered == 0 {
            warn!(target: REGISTRY_TARGET, "no handlers supplied for registration");
        }
        Ok(())
    }

    /// Returns the handler bound to `command_type`, if any.
    ///
    /// Matching is exact and case-sensitive.
    #[must_use]
    pub fn lookup(&self, command_type: &str) -> Option<HandlerBox> {
        let handler = self.read().get(command_type).cloned();
        if handler.is_none() {
            debug!(target: REGISTRY_TARGET, command_type, "no handler registered");
        }
        handler
    }

    /// Removes and returns the handler bound to `command_type`.
    pub fn unregister(&self, command_type: &str) -> Option<HandlerBox> {
        let removed = self.write().remove(command_type);
        if let Some(handler) = &removed {
            info!(
                target: REGISTRY_TARGET,
                command_type,
                handler = handler.handler_type(),
                "handler unregistered"
            );
        }
        removed
    }

    /// Returns `true` when a handler is bound to `command_type`.
    #[must_use]
    pub fn contains(&self, command_type: &str) -> bool {
        self.read().contains_key(command_type)
    }

    /// Registered handlers sorted by discriminator.
    #[must_use]
    pub fn list(&self) -> Vec<HandlerBox> {
        let mut handlers: Vec<HandlerBox> = self.read().values().cloned().collect();
        handlers.sort_by(|left, right| left.compatible_type().cmp(right.compatible_type()));
        handlers
    }

    /// Registered discriminators in sorted order.
    #[must_use]
    pub fn command_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.read().keys().cloned().collect();
        types.sort();
        types
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` when no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave the map half-updated: every
    // mutation is a single insert or remove.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, HandlerBox>> {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, HandlerBox>> {
        self.handlers.write().unwrap_or_else(PoisonError::into_inner)
    }
}
