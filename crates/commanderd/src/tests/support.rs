//! Shared fixtures for the service test suites.

use std::ffi::OsString;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use ortho_config::{OrthoConfig, OrthoError};

use commander::{
    BoxError, CommandHandler, HandlerBox, HandlerDescriptor, HandlerDiscovery, RegistrationError,
};
use commander_config::Config;

use crate::bootstrap::{BootstrapError, ConfigLoader, StaticConfigLoader};
use crate::cookies::{CookieDiscovery, SugarComaCookieOrder, SugarComaCookieOrderResponse};
use crate::health::HealthReporter;

/// Configuration bound to an ephemeral loopback port.
pub fn test_config() -> Config {
    Config {
        listen_address: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
        ..Config::default()
    }
}

/// Loader returning [`test_config`].
pub fn healthy_loader() -> StaticConfigLoader {
    StaticConfigLoader::new(test_config())
}

/// Loader that fails by passing an unparseable listen address.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("commanderd"),
            OsString::from("--listen-address"),
            OsString::from("not-an-address"),
        ];
        Config::load_from_iter(args)
    }
}

/// Discovery yielding every cookie handler twice.
pub fn duplicated_cookies() -> impl HandlerDiscovery {
    || -> Option<Vec<HandlerBox>> {
        let mut handlers = CookieDiscovery::standard().discover()?;
        handlers.extend(CookieDiscovery::standard().discover()?);
        Some(handlers)
    }
}

/// Handler whose declared discriminator does not match its command.
struct MislabelledHandler;

impl CommandHandler for MislabelledHandler {
    type Command = SugarComaCookieOrder;

    fn compatible_type(&self) -> &str {
        "SugarComa"
    }

    fn execute(
        &self,
        _command: SugarComaCookieOrder,
    ) -> Result<SugarComaCookieOrderResponse, BoxError> {
        Ok(SugarComaCookieOrderResponse::default())
    }
}

/// Discovery yielding only [`MislabelledHandler`].
pub fn mislabelled() -> impl HandlerDiscovery {
    || -> Option<Vec<HandlerBox>> {
        Some(vec![
            HandlerDescriptor::with_defaults(MislabelledHandler).into(),
        ])
    }
}

/// Records health events for assertions.
#[derive(Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config, handlers: usize) {
        self.record(HealthEvent::BootstrapSucceeded { handlers });
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn handler_registered(&self, command_type: &str, _handler: &str) {
        self.record(HealthEvent::HandlerRegistered(command_type.to_owned()));
    }

    fn handler_rejected(&self, error: &RegistrationError) {
        self.record(HealthEvent::HandlerRejected(error.code().to_owned()));
    }

    fn listening(&self, _address: SocketAddr, endpoint: &str) {
        self.record(HealthEvent::Listening(endpoint.to_owned()));
    }

    fn stopped(&self) {
        self.record(HealthEvent::Stopped);
    }
}

/// Lifecycle events tracked during tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded { handlers: usize },
    BootstrapFailed(String),
    HandlerRegistered(String),
    /// Carries the registration error code.
    HandlerRejected(String),
    Listening(String),
    Stopped,
}
