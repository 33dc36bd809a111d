//! Structured health reporting for service lifecycle events.

use std::net::SocketAddr;
use std::sync::Arc;

use commander::RegistrationError;
use commander_config::Config;

use crate::bootstrap::BootstrapError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
#[cfg_attr(test, mockall::automock)]
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after configuration, telemetry and handlers are ready.
    fn bootstrap_succeeded(&self, config: &Config, handlers: usize);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked after a handler is admitted to the registry.
    fn handler_registered(&self, command_type: &str, handler: &str);

    /// Invoked when the registry refuses a handler.
    fn handler_rejected(&self, error: &RegistrationError);

    /// Invoked once the listener accepts connections.
    fn listening(&self, address: SocketAddr, endpoint: &str);

    /// Invoked after the listener has drained and stopped.
    fn stopped(&self);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config, handlers: usize) {
        (**self).bootstrap_succeeded(config, handlers);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn handler_registered(&self, command_type: &str, handler: &str) {
        (**self).handler_registered(command_type, handler);
    }

    fn handler_rejected(&self, error: &RegistrationError) {
        (**self).handler_rejected(error);
    }

    fn listening(&self, address: SocketAddr, endpoint: &str) {
        (**self).listening(address, endpoint);
    }

    fn stopped(&self) {
        (**self).stopped();
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting service bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config, handlers: usize) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            endpoint = %config.endpoint_path(),
            listen_address = %config.listen_address(),
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            handlers,
            "service bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "service bootstrap failed"
        );
    }

    fn handler_registered(&self, command_type: &str, handler: &str) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "handler_registered",
            command_type,
            handler,
            "handler registered"
        );
    }

    fn handler_rejected(&self, error: &RegistrationError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "handler_rejected",
            code = error.code(),
            error = %error,
            "handler rejected"
        );
    }

    fn listening(&self, address: SocketAddr, endpoint: &str) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "listening",
            address = %address,
            endpoint,
            "accepting commands"
        );
    }

    fn stopped(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "stopped",
            "listener stopped"
        );
    }
}
