//! Command and response contracts.
//!
//! A [`Command`] is a serde value type carrying an intrinsic discriminator. The
//! discriminator is the wire-level `type` field that clients send; it must be
//! the same for every instance of a given command type. Each command names its
//! paired [`CommandResponse`] through an associated type so a handler can never
//! return the wrong response shape.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::validation::ValidationErrors;

/// Boxed error returned by handlers when execution fails.
///
/// Any error type implementing [`std::error::Error`] converts into this alias
/// through `?`, so handler bodies can propagate their own domain errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A request variant addressed by its discriminator.
///
/// # Example
///
/// ```
/// use commander::{Command, CommandResponse};
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
/// assert_eq!(Echo::default().command_type(), "Echo");
/// ```
pub trait Command: DeserializeOwned + Serialize + Send + 'static {
    /// Response type produced when this command is handled.
    type Response: CommandResponse;

    /// Returns the discriminator identifying this command variant.
    ///
    /// Implementations must return the same non-empty value for every
    /// instance of the type.
    fn command_type(&self) -> &str;

    /// Checks field-level constraints after deserialization.
    ///
    /// The default accepts every instance. Override it to reject payloads
    /// that parse but violate domain rules; the dispatcher reports the
    /// returned violations without invoking the handler.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing each violated field.
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// Marker for values returned by command handlers.
pub trait CommandResponse: Serialize + Send + 'static {}

impl CommandResponse for () {}
