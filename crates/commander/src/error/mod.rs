//! Errors raised while registering handlers and dispatching payloads.
//!
//! Registration errors surface at startup when a handler is inconsistent with
//! the command type it is bound to. Dispatch errors surface per request and
//! carry the discriminator and type names involved so a failure can be
//! diagnosed from the log line alone.

use std::fmt;

use thiserror::Error;

use crate::command::BoxError;
use crate::validation::ValidationErrors;

/// Which half of a handler binding a registration error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRole {
    /// The command (input) type.
    Command,
    /// The response (output) type.
    Response,
}

impl fmt::Display for TypeRole {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Command => "command",
            Self::Response => "response",
        })
    }
}

/// Errors rejecting a handler at registration time.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// No factory was supplied to build a sample of the bound type.
    #[error(
        "handler '{handler}' cannot be verified: no default construction for {role} type \
         '{type_name}'"
    )]
    NoDefaultConstructor {
        /// Handler type name.
        handler: &'static str,
        /// Type that could not be constructed.
        type_name: &'static str,
        /// Whether the missing factory is for the command or the response.
        role: TypeRole,
    },

    /// The handler's declared discriminator disagrees with its command type.
    #[error(
        "handler '{handler}' declares command type '{declared}' but its command reports \
         '{actual}'"
    )]
    TypeMismatch {
        /// Handler type name.
        handler: &'static str,
        /// Discriminator returned by the handler.
        declared: String,
        /// Discriminator returned by a sample command instance.
        actual: String,
    },

    /// Another handler already owns the discriminator.
    #[error(
        "command type '{command_type}' is already handled by '{existing}'; rejected '{rejected}'"
    )]
    DuplicateRegistration {
        /// Contested discriminator.
        command_type: String,
        /// Handler type that keeps the registration.
        existing: &'static str,
        /// Handler type whose registration was refused.
        rejected: &'static str,
    },
}

impl RegistrationError {
    /// Stable snake_case identifier for the failure kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoDefaultConstructor { .. } => "no_default_constructor",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::DuplicateRegistration { .. } => "duplicate_registration",
        }
    }
}

/// Errors surfaced while dispatching a single payload.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The payload has no parseable string `type` field.
    #[error("malformed envelope: {message}")]
    MalformedEnvelope {
        /// Description of what was wrong with the payload.
        message: String,
        /// Underlying JSON error, when parsing failed outright.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// No handler is registered for the discriminator.
    #[error("command type '{command_type}' is not supported")]
    UnknownCommandType {
        /// Discriminator taken from the payload.
        command_type: String,
    },

    /// The payload does not fit the resolved handler's command type.
    #[error("failed to deserialise '{command_type}' payload into '{target}': {source}")]
    PayloadDeserialization {
        /// Discriminator taken from the payload.
        command_type: String,
        /// Command type the payload was parsed against.
        target: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The parsed command violated its own field constraints.
    #[error("command '{command_type}' failed validation: {violations}")]
    Validation {
        /// Discriminator taken from the payload.
        command_type: String,
        /// Violated constraints.
        violations: ValidationErrors,
    },

    /// The handler returned an error.
    #[error("handler '{handler}' failed to execute '{command_type}': {source}")]
    HandlerExecution {
        /// Discriminator taken from the payload.
        command_type: String,
        /// Handler type name.
        handler: &'static str,
        /// Error produced by the handler.
        #[source]
        source: BoxError,
    },

    /// The handler's response could not be converted to JSON.
    #[error("failed to serialise response of '{command_type}' ('{target}'): {source}")]
    ResponseSerialization {
        /// Discriminator taken from the payload.
        command_type: String,
        /// Response type that failed to serialise.
        target: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl DispatchError {
    /// Creates a malformed envelope error from a serde error.
    #[must_use]
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedEnvelope {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed envelope error with a custom message.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedEnvelope {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an unknown command type error.
    #[must_use]
    pub fn unknown_command_type(command_type: impl Into<String>) -> Self {
        Self::UnknownCommandType {
            command_type: command_type.into(),
        }
    }

    /// Stable snake_case identifier for the failure kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MalformedEnvelope { .. } => "malformed_envelope",
            Self::UnknownCommandType { .. } => "unknown_command_type",
            Self::PayloadDeserialization { .. } => "payload_deserialization",
            Self::Validation { .. } => "validation",
            Self::HandlerExecution { .. } => "handler_execution",
            Self::ResponseSerialization { .. } => "response_serialization",
        }
    }

    /// Discriminator the failure relates to, once it is known.
    #[must_use]
    pub fn command_type(&self) -> Option<&str> {
        match self {
            Self::MalformedEnvelope { .. } => None,
            Self::UnknownCommandType { command_type }
            | Self::PayloadDeserialization { command_type, .. }
            | Self::Validation { command_type, .. }
            | Self::HandlerExecution { command_type, .. }
            | Self::ResponseSerialization { command_type, .. } => Some(command_type),
        }
    }

    /// Returns `true` when the caller sent something it can fix.
    ///
    /// Handler and serialisation failures are server-side and return `false`.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedEnvelope { .. }
                | Self::UnknownCommandType { .. }
                | Self::PayloadDeserialization { .. }
                | Self::Validation { .. }
        )
    }
}
