use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::endpoint::EndpointPath;
use crate::logging::LogFormat;

/// Path segment the dispatch endpoint is mounted on when none is configured.
pub const DEFAULT_ENDPOINT_PATH: &str = "execute";

/// Port the service listens on when none is configured.
pub const DEFAULT_PORT: u16 = 8080;

/// Largest request body accepted by default, in bytes (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default dispatch endpoint path.
#[must_use]
pub fn default_endpoint_path() -> EndpointPath {
    EndpointPath::from_segment(DEFAULT_ENDPOINT_PATH)
}

/// Default listen address: loopback on [`DEFAULT_PORT`].
#[must_use]
pub const fn default_listen_address() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT)
}

/// Default request body limit.
#[must_use]
pub const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Default log filter expression used by the binaries.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
