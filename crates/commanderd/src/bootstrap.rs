//! Service bootstrap orchestration.

use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use commander::{Dispatcher, HandlerDiscovery, HandlerRegistry, RegistrationError};
use commander_config::Config;

use crate::health::HealthReporter;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the service configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader's aggregated configuration error.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader returning a configuration resolved elsewhere.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps an already resolved configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// A discovered handler was refused by the registry.
    #[error("failed to register handlers: {source}")]
    Registration {
        /// Registry error for the first refused handler.
        #[source]
        source: RegistrationError,
    },
}

/// Result of a successful bootstrap: configuration plus a ready dispatcher.
pub struct Service {
    config: Config,
    dispatcher: Dispatcher,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Service {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Dispatcher wired to the populated registry.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Reporter receiving lifecycle events.
    #[must_use]
    pub fn reporter(&self) -> Arc<dyn HealthReporter> {
        Arc::clone(&self.reporter)
    }

    /// Splits the service into its configuration, dispatcher, and reporter.
    #[must_use]
    pub fn into_parts(self) -> (Config, Dispatcher, Arc<dyn HealthReporter>) {
        (self.config, self.dispatcher, self.reporter)
    }
}

/// Bootstraps the service using the supplied collaborators.
///
/// Loads configuration, installs telemetry, then registers every handler the
/// discovery source yields. Any refused handler aborts startup so a
/// misconfigured service never starts accepting requests.
///
/// # Errors
///
/// Returns the [`BootstrapError`] for the first stage that failed; the
/// reporter is told about it before this returns.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    discovery: &dyn HandlerDiscovery,
) -> Result<Service, BootstrapError> {
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let telemetry = match telemetry::initialise(&config) {
        Ok(handle) => handle,
        Err(source) => {
            let error = BootstrapError::Telemetry { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let registry = HandlerRegistry::new();
    if let Err(source) = register_discovered(&registry, discovery, reporter.as_ref()) {
        let error = BootstrapError::Registration { source };
        reporter.bootstrap_failed(&error);
        return Err(error);
    }

    reporter.bootstrap_succeeded(&config, registry.len());
    Ok(Service {
        config,
        dispatcher: Dispatcher::from(registry),
        telemetry,
        reporter,
    })
}

fn register_discovered(
    registry: &HandlerRegistry,
    discovery: &dyn HandlerDiscovery,
    reporter: &dyn HealthReporter,
) -> Result<(), RegistrationError> {
    let handlers = discovery.discover().unwrap_or_default();
    if handlers.is_empty() {
        return registry.register_all(Some(handlers));
    }

    for handler in handlers {
        let command_type = handler.compatible_type().to_owned();
        let handler_type = handler.handler_type();
        registry
            .register(handler)
            .inspect_err(|error| reporter.handler_rejected(error))?;
        reporter.handler_registered(&command_type, handler_type);
    }
    Ok(())
}
