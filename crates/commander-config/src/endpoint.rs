use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters with meaning in a query, fragment, or route pattern.
const RESERVED: [char; 6] = ['?', '#', ':', '*', '{', '}'];

/// URL path the dispatch endpoint is served on.
///
/// Values are normalised to a single leading `/` and no trailing `/`, so
/// `execute`, `/execute` and `/execute/` all name the same route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct EndpointPath(String);

impl EndpointPath {
    /// Parses and normalises a configured path.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointPathError`] when the path is empty, is only `/`,
    /// contains whitespace, a query string or a fragment, or uses route
    /// pattern syntax (`:`, `*`, `{`, `}`).
    pub fn parse(raw: &str) -> Result<Self, EndpointPathError> {
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Err(EndpointPathError::Empty);
        }
        if let Some(character) = trimmed
            .chars()
            .find(|c| c.is_whitespace() || RESERVED.contains(c))
        {
            return Err(EndpointPathError::InvalidCharacter {
                path: raw.to_owned(),
                character,
            });
        }
        if trimmed.split('/').any(str::is_empty) {
            return Err(EndpointPathError::EmptySegment {
                path: raw.to_owned(),
            });
        }
        Ok(Self(format!("/{trimmed}")))
    }

    /// Builds a path from a known-good segment.
    pub(crate) fn from_segment(segment: &str) -> Self {
        Self(format!("/{segment}"))
    }

    /// Normalised path including the leading `/`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointPath {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl FromStr for EndpointPath {
    type Err = EndpointPathError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl TryFrom<String> for EndpointPath {
    type Error = EndpointPathError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<EndpointPath> for String {
    fn from(path: EndpointPath) -> Self {
        path.0
    }
}

impl AsRef<str> for EndpointPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors raised while parsing an [`EndpointPath`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointPathError {
    /// Nothing remained once surrounding slashes were removed.
    #[error("endpoint path must name at least one segment")]
    Empty,
    /// The path contains a character that cannot appear in a route.
    #[error("endpoint path '{path}' contains invalid character {character:?}")]
    InvalidCharacter {
        /// Path as configured.
        path: String,
        /// First offending character.
        character: char,
    },
    /// Two consecutive slashes appear inside the path.
    #[error("endpoint path '{path}' contains an empty segment")]
    EmptySegment {
        /// Path as configured.
        path: String,
    },
}
