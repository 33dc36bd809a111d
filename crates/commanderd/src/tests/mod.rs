//! Test suites for the service bootstrap and process lifecycle.

mod support;
