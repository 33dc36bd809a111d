//! Field-level validation failures reported for parsed commands.

use std::fmt;

use serde::Serialize;

/// A single violated constraint on a command field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    field: String,
    message: String,
}

impl FieldViolation {
    /// Builds a violation for the named field.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending field as it appears on the wire.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Human-readable description of the violated constraint.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Collection of violations produced by [`Command::validate`].
///
/// [`Command::validate`]: crate::Command::validate
///
/// # Example
///
/// ```
/// use commander::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.push("name", "must be at least 2 characters");
/// assert_eq!(errors.len(), 1);
/// assert!(errors.into_result().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Records a violation for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, message));
    }

    /// Returns `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the collection itself when at least one violation is present.
    pub fn into_result(self) -> Result<(), Self> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Recorded violations in insertion order.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Number of recorded violations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns `true` when no violation was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.violations {
            if !first {
                formatter.write_str("; ")?;
            }
            first = false;
            write!(formatter, "'{}' {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}
