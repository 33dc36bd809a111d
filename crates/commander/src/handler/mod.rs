//! Handler contracts and the type-erased handle stored by the registry.
//!
//! A [`CommandHandler`] is strongly typed: it accepts exactly one [`Command`]
//! type and returns that command's paired response. The registry, however,
//! must keep handlers for many command types in a single map. The
//! [`HandlerBox`] bridges the two: it owns a [`HandlerDescriptor`] behind a
//! trait object whose methods work on raw payloads, so the typed
//! deserialise/execute/serialise sequence stays monomorphic inside the box
//! while the outer map stays homogeneous.
//!
//! ## Sharing contract
//!
//! Handlers are long-lived and shared. One instance serves every request for
//! its discriminator, possibly from many threads at once; the framework never
//! creates a fresh handler per call. Handlers that keep mutable state must
//! synchronise it themselves.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::command::{BoxError, Command};
use crate::envelope;
use crate::error::{DispatchError, RegistrationError};
use crate::verifier;

/// Response type paired with a handler's command.
pub type ResponseOf<H> = <<H as CommandHandler>::Command as Command>::Response;

/// Business logic bound to one command type.
///
/// # Example
///
/// ```
/// use commander::{BoxError, Command, CommandHandler, CommandResponse};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, Deserialize, Serialize)]
/// struct Echo {
///     text: String,
/// }
///
/// #[derive(Debug, Default, Serialize)]
/// struct EchoResponse {
///     text: String,
/// }
///
/// impl CommandResponse for EchoResponse {}
///
/// impl Command for Echo {
///     type Response = EchoResponse;
///
///     fn command_type(&self) -> &str {
///         "Echo"
///     }
/// }
///
/// struct EchoHandler;
///
/// impl CommandHandler for EchoHandler {
///     type Command = Echo;
///
///     fn compatible_type(&self) -> &str {
///         "Echo"
///     }
///
///     fn execute(&self, command: Echo) -> Result<EchoResponse, BoxError> {
///         Ok(EchoResponse { text: command.text })
///     }
/// }
/// ```
pub trait CommandHandler: Send + Sync + 'static {
    /// Command type this handler accepts.
    type Command: Command;

    /// Discriminator this handler is registered under.
    ///
    /// Must equal the discriminator reported by instances of
    /// [`Self::Command`]; registration verifies this.
    fn compatible_type(&self) -> &str;

    /// Handles a fully deserialised command.
    ///
    /// # Errors
    ///
    /// Returns any domain error raised while handling the command. The
    /// dispatcher wraps it in [`DispatchError::HandlerExecution`].
    fn execute(&self, command: Self::Command) -> Result<ResponseOf<Self>, BoxError>;
}

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;

/// A handler plus the factories used to verify its type binding.
///
/// The factories stand in for default construction: the verifier calls them
/// once at registration to obtain a sample command (whose discriminator is
/// compared with [`CommandHandler::compatible_type`]) and a sample response.
/// The catalogue reuses them to render example payloads.
pub struct HandlerDescriptor<H: CommandHandler> {
    handler: H,
    command_factory: Option<Factory<H::Command>>,
    response_factory: Option<Factory<ResponseOf<H>>>,
}

impl<H: CommandHandler> HandlerDescriptor<H> {
    /// Wraps a handler without any factories.
    ///
    /// Attach factories with [`Self::with_command_factory`] and
    /// [`Self::with_response_factory`]; registration fails while either is
    /// missing.
    #[must_use]
    pub const fn new(handler: H) -> Self {
        Self {
            handler,
            command_factory: None,
            response_factory: None,
        }
    }

    /// Supplies the factory producing a sample command.
    #[must_use]
    pub fn with_command_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> H::Command + Send + Sync + 'static,
    {
        self.command_factory = Some(Box::new(factory));
        self
    }

    /// Supplies the factory producing a sample response.
    #[must_use]
    pub fn with_response_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> ResponseOf<H> + Send + Sync + 'static,
    {
        self.response_factory = Some(Box::new(factory));
        self
    }

    /// Wrapped handler.
    #[must_use]
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Discriminator declared by the handler.
    #[must_use]
    pub fn compatible_type(&self) -> &str {
        self.handler.compatible_type()
    }

    /// Builds a sample command, when a factory was supplied.
    #[must_use]
    pub fn sample_command(&self) -> Option<H::Command> {
        self.command_factory.as_ref().map(|factory| factory())
    }

    /// Builds a sample response, when a factory was supplied.
    #[must_use]
    pub fn sample_response(&self) -> Option<ResponseOf<H>> {
        self.response_factory.as_ref().map(|factory| factory())
    }

    /// Type name of the handler.
    #[must_use]
    pub fn handler_type(&self) -> &'static str {
        type_name::<H>()
    }

    /// Type name of the bound command.
    #[must_use]
    pub fn command_type_name(&self) -> &'static str {
        type_name::<H::Command>()
    }

    /// Type name of the bound response.
    #[must_use]
    pub fn response_type_name(&self) -> &'static str {
        type_name::<ResponseOf<H>>()
    }
}

impl<H> HandlerDescriptor<H>
where
    H: CommandHandler,
    H::Command: Default,
    ResponseOf<H>: Default,
{
    /// Wraps a handler using `Default` for both sample factories.
    #[must_use]
    pub fn with_defaults(handler: H) -> Self {
        Self::new(handler)
            .with_command_factory(H::Command::default)
            .with_response_factory(ResponseOf::<H>::default)
    }
}

impl<H: CommandHandler> fmt::Debug for HandlerDescriptor<H> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HandlerDescriptor")
            .field("handler", &self.handler_type())
            .field("compatible_type", &self.compatible_type())
            .field("has_command_factory", &self.command_factory.is_some())
            .field("has_response_factory", &self.response_factory.is_some())
            .finish()
    }
}

/// Payload-level operations a registered handler exposes once its concrete
/// types are erased.
trait ErasedHandler: Send + Sync {
    fn compatible_type(&self) -> &str;
    fn handler_type(&self) -> &'static str;
    fn command_type_name(&self) -> &'static str;
    fn response_type_name(&self) -> &'static str;
    fn verify(&self) -> Result<(), RegistrationError>;
    fn invoke(&self, command_type: &str, payload: &[u8]) -> Result<String, DispatchError>;
    fn sample_command(&self) -> Option<Result<Value, serde_json::Error>>;
    fn sample_response(&self) -> Option<Result<Value, serde_json::Error>>;
}

impl<H: CommandHandler> ErasedHandler for HandlerDescriptor<H> {
    fn compatible_type(&self) -> &str {
        Self::compatible_type(self)
    }

    fn handler_type(&self) -> &'static str {
        Self::handler_type(self)
    }

    fn command_type_name(&self) -> &'static str {
        Self::command_type_name(self)
    }

    fn response_type_name(&self) -> &'static str {
        Self::response_type_name(self)
    }

    fn verify(&self) -> Result<(), RegistrationError> {
        verifier::verify(self)
    }

    fn invoke(&self, command_type: &str, payload: &[u8]) -> Result<String, DispatchError> {
        let command: H::Command = serde_json::from_slice(payload).map_err(|source| {
            DispatchError::PayloadDeserialization {
                command_type: command_type.to_owned(),
                target: self.command_type_name(),
                source,
            }
        })?;

        command
            .validate()
            .map_err(|violations| DispatchError::Validation {
                command_type: command_type.to_owned(),
                violations,
            })?;

        let response =
            self.handler
                .execute(command)
                .map_err(|source| DispatchError::HandlerExecution {
                    command_type: command_type.to_owned(),
                    handler: self.handler_type(),
                    source,
                })?;

        serde_json::to_string(&response).map_err(|source| DispatchError::ResponseSerialization {
            command_type: command_type.to_owned(),
            target: self.response_type_name(),
            source,
        })
    }

    fn sample_command(&self) -> Option<Result<Value, serde_json::Error>> {
        Self::sample_command(self).map(|command| {
            envelope::seal(&command).and_then(|payload| serde_json::from_str(&payload))
        })
    }

    fn sample_response(&self) -> Option<Result<Value, serde_json::Error>> {
        Self::sample_response(self).map(|response| serde_json::to_value(&response))
    }
}

/// Type-erased, cheaply cloneable handle to a registered handler.
///
/// Clones share the same handler instance.
#[derive(Clone)]
pub struct HandlerBox {
    inner: Arc<dyn ErasedHandler>,
}

impl HandlerBox {
    /// Erases the concrete types of a descriptor.
    #[must_use]
    pub fn new<H: CommandHandler>(descriptor: HandlerDescriptor<H>) -> Self {
        Self {
            inner: Arc::new(descriptor),
        }
    }

    /// Discriminator the handler is bound to.
    #[must_use]
    pub fn compatible_type(&self) -> &str {
        self.inner.compatible_type()
    }

    /// Type name of the handler.
    #[must_use]
    pub fn handler_type(&self) -> &'static str {
        self.inner.handler_type()
    }

    /// Type name of the bound command.
    #[must_use]
    pub fn command_type_name(&self) -> &'static str {
        self.inner.command_type_name()
    }

    /// Type name of the bound response.
    #[must_use]
    pub fn response_type_name(&self) -> &'static str {
        self.inner.response_type_name()
    }

    /// Checks that the handler is consistent with its command and response
    /// types.
    ///
    /// # Errors
    ///
    /// See [`verifier::verify`].
    pub fn verify(&self) -> Result<(), RegistrationError> {
        self.inner.verify()
    }

    /// Runs the typed half of dispatch against a raw payload.
    ///
    /// `command_type` is the discriminator already decoded from `payload`; it
    /// is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::PayloadDeserialization`],
    /// [`DispatchError::Validation`], [`DispatchError::HandlerExecution`], or
    /// [`DispatchError::ResponseSerialization`] for the step that failed.
    pub fn invoke(&self, command_type: &str, payload: &[u8]) -> Result<String, DispatchError> {
        self.inner.invoke(command_type, payload)
    }

    /// Example payload built from the command factory, including `type`.
    #[must_use]
    pub fn sample_command(&self) -> Option<Result<Value, serde_json::Error>> {
        self.inner.sample_command()
    }

    /// Example response built from the response factory.
    #[must_use]
    pub fn sample_response(&self) -> Option<Result<Value, serde_json::Error>> {
        self.inner.sample_response()
    }

    /// Returns `true` when both handles share one handler instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<H: CommandHandler> From<HandlerDescriptor<H>> for HandlerBox {
    fn from(descriptor: HandlerDescriptor<H>) -> Self {
        Self::new(descriptor)
    }
}

impl fmt::Debug for HandlerBox {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HandlerBox")
            .field("compatible_type", &self.compatible_type())
            .field("handler", &self.handler_type())
            .field("command", &self.command_type_name())
            .field("response", &self.response_type_name())
            .finish()
    }
}

#[cfg(test)]
mod tests;
