//! Command dispatch service.
//!
//! `commanderd` exposes a [`commander::Dispatcher`] over HTTP. Every command
//! is posted as JSON to one configurable endpoint, and the `type` field picks
//! the handler. A `GET` on the same endpoint lists the registered commands
//! with sample payloads.
//!
//! Startup runs in a fixed order: configuration is loaded through
//! [`commander_config::Config`], structured telemetry is installed, and the
//! handlers yielded by a [`commander::HandlerDiscovery`] source are verified
//! and registered. A refused handler aborts startup. Each stage reports to a
//! [`HealthReporter`] so operators can follow the lifecycle in the logs.
//!
//! The binary serves the demo cookie orders in [`cookies`].

mod bootstrap;
pub mod cookies;
mod health;
pub mod http;
mod process;
mod telemetry;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Service, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{LaunchError, run_service, run_service_with, serve};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
