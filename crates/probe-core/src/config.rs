//! Prober configuration

use crate::endpoint::{default_endpoints, ensure_plain_base, EndpointSpec};
use crate::error::{ProbeError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::num::ParseIntError;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_STATUS_ID: &str = "dummy-id";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_BASE_URL: &str = "PROBE_BASE_URL";
pub const ENV_STATUS_ID: &str = "PROBE_STATUS_ID";
pub const ENV_TIMEOUT_SECS: &str = "PROBE_TIMEOUT_SECS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    pub base_url: String,
    /// Substituted for `{id}` in endpoint paths
    pub status_id: String,
    pub timeout_secs: u64,
    pub endpoints: Vec<EndpointSpec>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            status_id: DEFAULT_STATUS_ID.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            endpoints: default_endpoints(),
        }
    }
}

impl ProbeConfig {
    /// Defaults overridden by `PROBE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(status_id) = lookup(ENV_STATUS_ID) {
            config.status_id = status_id;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = timeout.trim().parse().map_err(|e: ParseIntError| {
                ProbeError::InvalidConfig {
                    key: ENV_TIMEOUT_SECS.to_string(),
                    reason: e.to_string(),
                }
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_status_id(mut self, status_id: impl Into<String>) -> Self {
        self.status_id = status_id.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Vec<EndpointSpec>) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.parsed_base_url()?;
        if self.timeout_secs == 0 {
            return Err(ProbeError::InvalidConfig {
                key: ENV_TIMEOUT_SECS.to_string(),
                reason: "timeout must be at least one second".to_string(),
            });
        }
        Ok(())
    }

    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| ProbeError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ProbeError::InvalidBaseUrl {
                    url: self.base_url.clone(),
                    reason: format!("unsupported scheme '{}'", other),
                })
            }
        }
        ensure_plain_base(&url)?;
        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
