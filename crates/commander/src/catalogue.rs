//! Read-only description of the registered command surface.
//!
//! The catalogue lists each discriminator with its handler, command and
//! response type names, plus example payloads rendered from the samples the
//! verifier used. Clients use it to discover which commands the endpoint
//! accepts.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::handler::HandlerBox;
use crate::registry::HandlerRegistry;

const CATALOGUE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::catalogue");

/// One registered command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogueEntry {
    /// Discriminator clients send in the `type` field.
    #[serde(rename = "type")]
    pub command_type: String,
    /// Handler type name.
    pub handler: &'static str,
    /// Command type name.
    pub command: &'static str,
    /// Response type name.
    pub response: &'static str,
    /// Example request payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_command: Option<Value>,
    /// Example response body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_response: Option<Value>,
}

impl CatalogueEntry {
    /// Describes a single handler.
    #[must_use]
    pub fn describe(handler: &HandlerBox) -> Self {
        let command_type = handler.compatible_type().to_owned();
        Self {
            example_command: render(&command_type, "command", handler.sample_command()),
            example_response: render(&command_type, "response", handler.sample_response()),
            handler: handler.handler_type(),
            command: handler.command_type_name(),
            response: handler.response_type_name(),
            command_type,
        }
    }
}

/// Snapshot of every registered command, sorted by discriminator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalogue {
    commands: Vec<CatalogueEntry>,
}

impl Catalogue {
    /// Captures the registry's current contents.
    #[must_use]
    pub fn from_registry(registry: &HandlerRegistry) -> Self {
        Self {
            commands: registry.list().iter().map(CatalogueEntry::describe).collect(),
        }
    }

    /// Entries in discriminator order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogueEntry] {
        &self.commands
    }

    /// Looks up the entry for `command_type`.
    #[must_use]
    pub fn entry(&self, command_type: &str) -> Option<&CatalogueEntry> {
        self.commands
            .iter()
            .find(|entry| entry.command_type == command_type)
    }
}

fn render(
    command_type: &str,
    role: &'static str,
    sample: Option<Result<Value, serde_json::Error>>,
) -> Option<Value> {
    match sample? {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                target: CATALOGUE_TARGET,
                command_type,
                role,
                error = %err,
                "example could not be rendered"
            );
            None
        }
    }
}
