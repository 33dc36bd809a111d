//! Service process lifecycle: runtime construction, listener binding, and
//! graceful shutdown.

use std::future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::runtime::Builder;
use tracing::{error, info};

use commander::HandlerDiscovery;

use crate::bootstrap::{BootstrapError, ConfigLoader, Service, SystemConfigLoader, bootstrap_with};
use crate::cookies::CookieDiscovery;
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::http;

const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Errors surfaced while launching or running the service.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Bootstrapping the service failed.
    #[error("service bootstrap failed: {source}")]
    Bootstrap {
        /// Underlying bootstrap error.
        #[source]
        source: BootstrapError,
    },
    /// The async runtime could not be built.
    #[error("failed to start async runtime: {source}")]
    Runtime {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The listener could not be bound.
    #[error("failed to bind listener on {address}: {source}")]
    Bind {
        /// Address requested by configuration.
        address: SocketAddr,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The server stopped with an IO failure.
    #[error("server terminated abnormally: {source}")]
    Serve {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl From<BootstrapError> for LaunchError {
    fn from(source: BootstrapError) -> Self {
        Self::Bootstrap { source }
    }
}

/// Runs the service with the system configuration loader and the cookie
/// handlers until an interrupt or termination signal arrives.
///
/// # Errors
///
/// Returns a [`LaunchError`] when bootstrap, binding, or serving fails.
pub fn run_service() -> Result<(), LaunchError> {
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|source| LaunchError::Runtime { source })?;
    let reporter: Arc<dyn HealthReporter> = Arc::new(StructuredHealthReporter::new());
    runtime.block_on(run_service_with(
        &SystemConfigLoader,
        reporter,
        &CookieDiscovery::standard(),
        shutdown_signal(),
    ))
}

/// Bootstraps with the supplied collaborators, binds the configured address,
/// and serves until `shutdown` resolves.
///
/// # Errors
///
/// Returns a [`LaunchError`] when bootstrap, binding, or serving fails.
pub async fn run_service_with<F>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    discovery: &dyn HandlerDiscovery,
    shutdown: F,
) -> Result<(), LaunchError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let service = bootstrap_with(loader, reporter, discovery)?;
    let address = service.config().listen_address();
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| LaunchError::Bind { address, source })?;
    serve(listener, service, shutdown).await
}

/// Serves `service` on an already bound listener until `shutdown` resolves.
///
/// In-flight requests are allowed to finish before this returns.
///
/// # Errors
///
/// Returns [`LaunchError::Serve`] when the listener fails.
pub async fn serve<F>(
    listener: TcpListener,
    service: Service,
    shutdown: F,
) -> Result<(), LaunchError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (config, dispatcher, reporter) = service.into_parts();
    let local = listener
        .local_addr()
        .map_err(|source| LaunchError::Serve { source })?;
    let app = http::router(dispatcher, config.endpoint_path(), config.max_body_bytes());

    reporter.listening(local, config.endpoint_path().as_str());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|source| LaunchError::Serve { source })?;
    reporter.stopped();
    Ok(())
}

async fn shutdown_signal() {
    let interrupt = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            error!(target: PROCESS_TARGET, %error, "unable to install interrupt handler");
            future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                error!(target: PROCESS_TARGET, %error, "unable to install SIGTERM handler");
                future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = future::pending::<()>();

    tokio::select! {
        () = interrupt => {},
        () = terminate => {},
    }
    info!(target: PROCESS_TARGET, "shutdown signal received; draining connections");
}
