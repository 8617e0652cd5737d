//! # Probe Core
//!
//! Core types and the prober behind the endpoint existence checks.
//!
//! A probe sends a single HTTP `OPTIONS` request to an endpoint and accepts
//! the answer when its status code is on that endpoint's allow-list. The
//! checks only assert that an endpoint exists and answers plausibly; they
//! say nothing about what the endpoint does.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod prober;
pub mod report;

pub use config::ProbeConfig;
pub use endpoint::{default_endpoints, find_endpoint, merge_endpoints, EndpointSpec};
pub use error::{ProbeError, Result};
pub use prober::{EndpointProber, HttpTransport, Transport};
pub use report::{ProbeReport, ProbeResult, Verdict};

/// Current Probe version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build information for logs and `--version` output
pub const BUILD_INFO: &str = concat!(
    "Probe ",
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CARGO_PKG_NAME"),
    ")"
);

/// API paths of the service under test
pub mod endpoints {
    pub const HEALTH: &str = "/api/health";
    pub const CONVERT: &str = "/api/convert";
    pub const STATUS: &str = "/api/status/{id}";
    pub const UPLOAD: &str = "/api/upload";

    /// Placeholder substituted with the configured status id
    pub const ID_PLACEHOLDER: &str = "{id}";
}
