use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the service renders log events on standard error.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, fields flattened to the top level.
    #[default]
    Json,
    /// Single-line human-readable output.
    Compact,
    /// Multi-line human-readable output for local debugging.
    Pretty,
}

impl LogFormat {
    /// Returns `true` when events are rendered for machines rather than
    /// people.
    #[must_use]
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Error returned when text names no known [`LogFormat`].
pub type LogFormatParseError = strum::ParseError;
