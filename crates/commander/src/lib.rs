//! Typed command registry and dispatcher behind a single JSON entry point.
//!
//! The `commander` crate lets an application expose many operations through
//! one endpoint. Every inbound payload is a JSON object carrying a `type`
//! discriminator; the [`Dispatcher`] reads that discriminator, asks the
//! [`HandlerRegistry`] for the handler bound to it, deserialises the payload
//! into the handler's own [`Command`] type, and returns the handler's
//! [`CommandResponse`] serialised back to JSON.
//!
//! # Architecture
//!
//! - [`envelope`] performs the discriminator-only first decoding pass.
//! - [`handler`] defines [`CommandHandler`] and the type-erased [`HandlerBox`]
//!   the registry stores.
//! - [`verifier`] checks at registration time that a handler's declared
//!   discriminator matches the one its command type reports.
//! - [`registry`] stores verified handlers and rejects duplicates.
//! - [`dispatcher`] runs decode, lookup, typed parse, validation, execution
//!   and serialisation for one payload.
//!
//! Transport is out of scope here: `commanderd` binds the dispatcher to HTTP.
//!
//! # Example
//!
//! ```
//! use commander::{
//!     BoxError, Command, CommandHandler, CommandResponse, Dispatcher, HandlerBox,
//!     HandlerDescriptor, HandlerRegistry,
//! };
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Deserialize, Serialize)]
//! struct Greet {
//!     greeting: String,
//!     name: String,
//! }
//!
//! #[derive(Debug, Default, Serialize)]
//! struct Greeting {
//!     message: String,
//! }
//!
//! impl CommandResponse for Greeting {}
//!
//! impl Command for Greet {
//!     type Response = Greeting;
//!
//!     fn command_type(&self) -> &str {
//!         "Greet"
//!     }
//! }
//!
//! struct GreetHandler;
//!
//! impl CommandHandler for GreetHandler {
//!     type Command = Greet;
//!
//!     fn compatible_type(&self) -> &str {
//!         "Greet"
//!     }
//!
//!     fn execute(&self, command: Greet) -> Result<Greeting, BoxError> {
//!         Ok(Greeting {
//!             message: format!("{} {}", command.greeting, command.name),
//!         })
//!     }
//! }
//!
//! let registry = HandlerRegistry::new();
//! registry
//!     .register(HandlerBox::new(HandlerDescriptor::with_defaults(GreetHandler)))
//!     .expect("registration succeeds");
//!
//! let dispatcher = Dispatcher::from(registry);
//! let body = dispatcher
//!     .dispatch(r#"{"type":"Greet","greeting":"Hello","name":"Ada"}"#)
//!     .expect("dispatch succeeds");
//! assert_eq!(body, r#"{"message":"Hello Ada"}"#);
//! ```

pub mod catalogue;
pub mod command;
pub mod discovery;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod registry;
pub mod validation;
pub mod verifier;

#[cfg(test)]
mod tests;

pub use self::catalogue::{Catalogue, CatalogueEntry};
pub use self::command::{BoxError, Command, CommandResponse};
pub use self::discovery::{HandlerDiscovery, StaticDiscovery};
pub use self::dispatcher::{DISPATCH_TARGET, Dispatcher};
pub use self::envelope::{Envelope, TYPE_FIELD};
pub use self::error::{DispatchError, RegistrationError, TypeRole};
pub use self::handler::{CommandHandler, HandlerBox, HandlerDescriptor, ResponseOf};
pub use self::registry::HandlerRegistry;
pub use self::validation::{FieldViolation, ValidationErrors};
