//! Registration-time consistency checks for handler bindings.
//!
//! A handler is accepted only when samples of both its command and response
//! types can be built, and when the sample command reports the same non-blank
//! discriminator the handler declares. Failing early here keeps a
//! misconfigured handler from silently never matching any request.

use tracing::error;

use crate::command::Command;
use crate::error::{RegistrationError, TypeRole};
use crate::handler::{CommandHandler, HandlerDescriptor};

/// Tracing target for verification events.
const VERIFIER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::verifier");

/// Checks that a handler is consistent with its command and response types.
///
/// The checks run in this order: a sample command can be built, the sample
/// command's discriminator equals [`CommandHandler::compatible_type`], and a
/// sample response can be built. The comparison is exact and case-sensitive,
/// and a blank discriminator on either side never matches, since the envelope
/// decoder rejects blank `type` fields. Verification has no side effects
/// beyond logging.
///
/// # Errors
///
/// Returns [`RegistrationError::NoDefaultConstructor`] when a sample factory
/// is missing, or [`RegistrationError::TypeMismatch`] when the discriminators
/// disagree or either one is blank.
///
/// # Example
///
/// ```
/// use commander::{BoxError, Command, CommandHandler, HandlerDescriptor, verifier};
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
///     fn compatible_type(&self) -> &str { "Pong" }
///     fn execute(&self, _command: Ping) -> Result<(), BoxError> { Ok(()) }
/// }
///
/// let descriptor = HandlerDescriptor::with_defaults(PingHandler);
/// assert!(verifier::verify(&descriptor).is_err());
/// ```
pub fn verify<H: CommandHandler>(
    descriptor: &HandlerDescriptor<H>,
) -> Result<(), RegistrationError> {
    check(descriptor).inspect_err(|err| {
        error!(
            target: VERIFIER_TARGET,
            handler = descriptor.handler_type(),
            command_type = descriptor.compatible_type(),
            error = %err,
            "handler verification failed"
        );
    })
}

fn check<H: CommandHandler>(descriptor: &HandlerDescriptor<H>) -> Result<(), RegistrationError> {
    let handler = descriptor.handler_type();

    let Some(sample) = descriptor.sample_command() else {
        return Err(RegistrationError::NoDefaultConstructor {
            handler,
            type_name: descriptor.command_type_name(),
            role: TypeRole::Command,
        });
    };

    let declared = descriptor.compatible_type();
    let actual = sample.command_type();
    if declared != actual || is_blank(declared) || is_blank(actual) {
        return Err(RegistrationError::TypeMismatch {
            handler,
            declared: declared.to_owned(),
            actual: actual.to_owned(),
        });
    }

    if descriptor.sample_response().is_none() {
        return Err(RegistrationError::NoDefaultConstructor {
            handler,
            type_name: descriptor.response_type_name(),
            role: TypeRole::Response,
        });
    }

    Ok(())
}

fn is_blank(discriminator: &str) -> bool {
    discriminator.trim().is_empty()
}
