//! Discriminator-only decoding of inbound payloads.
//!
//! The dispatcher cannot pick a target type until it knows the payload's
//! `type` field, so decoding happens in two passes. This module implements the
//! first pass: it walks the top-level JSON object, keeps the `type` entry, and
//! skips every other field without building it. The second, typed pass happens
//! inside the handler binding once the registry has resolved the target.

use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;

use crate::command::Command;
use crate::error::DispatchError;

/// Name of the discriminator field on the wire.
pub const TYPE_FIELD: &str = "type";

/// Minimal view of a payload: just its discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    command_type: String,
}

impl Envelope {
    /// Decodes the discriminator from a raw JSON payload.
    ///
    /// Trailing whitespace (including a newline delimiter) is ignored. Every
    /// field other than `type` is skipped, whatever its shape.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MalformedEnvelope`] when the payload is empty,
    /// is not a JSON object, or its `type` field is missing, `null`, not a
    /// string, or blank.
    ///
    /// # Example
    ///
    /// ```
    /// use commander::Envelope;
    ///
    /// let envelope = Envelope::decode(br#"{"type":"Echo","text":"hi"}"#).unwrap();
    /// assert_eq!(envelope.command_type(), "Echo");
    /// ```
    pub fn decode(payload: &[u8]) -> Result<Self, DispatchError> {
        let trimmed = trim_trailing_whitespace(payload);
        if trimmed.is_empty() {
            return Err(DispatchError::malformed("empty payload"));
        }

        let raw: RawEnvelope =
            serde_json::from_slice(trimmed).map_err(DispatchError::from_json_error)?;
        match raw.command_type {
            None => Err(DispatchError::malformed("payload has no `type` field")),
            Some(None) => Err(DispatchError::malformed("`type` field is null")),
            Some(Some(command_type)) if command_type.trim().is_empty() => {
                Err(DispatchError::malformed("`type` field is empty"))
            }
            Some(Some(command_type)) => Ok(Self { command_type }),
        }
    }

    /// Discriminator carried by the payload.
    #[must_use]
    pub fn command_type(&self) -> &str {
        &self.command_type
    }

    /// Consumes the envelope, returning the discriminator.
    #[must_use]
    pub fn into_command_type(self) -> String {
        self.command_type
    }
}

/// Serialises a command and stamps its discriminator into the `type` field.
///
/// The result is a payload the dispatcher accepts for that command. Commands
/// without fields may serialise as `null`; they become `{"type": ...}`.
///
/// # Errors
///
/// Returns a serde error when the command cannot be serialised or does not
/// serialise to a JSON object.
///
/// # Example
///
/// ```
/// use commander::{Command, envelope};
/// # use serde::{Deserialize, Serialize};
/// # #[derive(Deserialize, Serialize)]
/// # struct Echo { text: String }
/// # impl Command for Echo {
/// #     type Response = ();
/// #     fn command_type(&self) -> &str { "Echo" }
/// # }
///
/// let payload = envelope::seal(&Echo { text: "hi".into() }).unwrap();
/// assert_eq!(payload, r#"{"text":"hi","type":"Echo"}"#);
/// ```
pub fn seal<C: Command>(command: &C) -> Result<String, serde_json::Error> {
    let object = match serde_json::to_value(command)? {
        Value::Object(mut map) => {
            map.insert(TYPE_FIELD.to_owned(), Value::from(command.command_type()));
            map
        }
        Value::Null => {
            let mut map = serde_json::Map::new();
            map.insert(TYPE_FIELD.to_owned(), Value::from(command.command_type()));
            map
        }
        other => {
            return Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "command '{}' must serialise to a JSON object, found {}",
                command.command_type(),
                json_kind(&other)
            )));
        }
    };
    serde_json::to_string(&Value::Object(object))
}

/// Partially decoded payload.
///
/// The outer `Option` records whether `type` was present at all; the inner one
/// whether it held `null`.
struct RawEnvelope {
    command_type: Option<Option<String>>,
}

impl<'de> Deserialize<'de> for RawEnvelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EnvelopeVisitor)
    }
}

struct EnvelopeVisitor;

impl<'de> Visitor<'de> for EnvelopeVisitor {
    type Value = RawEnvelope;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a JSON object carrying a string `type` field")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut command_type = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == TYPE_FIELD {
                if command_type.is_some() {
                    return Err(de::Error::duplicate_field(TYPE_FIELD));
                }
                command_type = Some(map.next_value::<Option<String>>()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(RawEnvelope { command_type })
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Trims trailing ASCII whitespace from a byte slice.
fn trim_trailing_whitespace(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |pos| pos + 1);
    bytes.get(..end).unwrap_or_default()
}
