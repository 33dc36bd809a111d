//! Layered configuration shared by the commander service and its tooling.
//!
//! Values resolve in increasing precedence from built-in defaults, an
//! optional TOML file named by `--config-path` or `COMMANDER_CONFIG_PATH`,
//! `COMMANDER_*` environment variables, and finally command-line flags.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod endpoint;
mod logging;

pub use defaults::{
    DEFAULT_ENDPOINT_PATH, DEFAULT_LOG_FILTER, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT,
    default_endpoint_path, default_listen_address, default_log_filter, default_log_filter_string,
    default_log_format, default_max_body_bytes,
};
pub use endpoint::{EndpointPath, EndpointPathError};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved configuration for the commander service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "COMMANDER")]
pub struct Config {
    /// Route the dispatch endpoint is served on.
    #[ortho_config(default = default_endpoint_path())]
    pub endpoint_path: EndpointPath,
    /// Socket address the HTTP listener binds.
    #[ortho_config(default = default_listen_address())]
    pub listen_address: SocketAddr,
    /// Largest request body accepted, in bytes.
    #[ortho_config(default = default_max_body_bytes())]
    pub max_body_bytes: usize,
    /// `tracing` filter directive applied at startup.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Rendering used for log events.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_path: default_endpoint_path(),
            listen_address: default_listen_address(),
            max_body_bytes: default_max_body_bytes(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Route the dispatch endpoint is served on.
    #[must_use]
    pub const fn endpoint_path(&self) -> &EndpointPath {
        &self.endpoint_path
    }

    /// Socket address the HTTP listener binds.
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Largest request body accepted, in bytes.
    #[must_use]
    pub const fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// `tracing` filter directive applied at startup.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Rendering used for log events.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
