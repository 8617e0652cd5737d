//! Endpoint existence prober
//!
//! One `OPTIONS` request per probe: no body, no auth headers, no retries.
//! A transport failure ends the probe as unreachable; a response is
//! classified against the endpoint's allow-list.

use crate::config::ProbeConfig;
use crate::endpoint::EndpointSpec;
use crate::error::{ProbeError, Result};
use crate::report::{ProbeReport, ProbeResult};
use async_trait::async_trait;
use reqwest::{Method, Url};
use std::error::Error as StdError;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Sends the discovery request and returns the raw status code
#[async_trait]
pub trait Transport: Send + Sync {
    /// Errors mean no response was received.
    async fn options(&self, url: &Url) -> Result<u16>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(crate::BUILD_INFO)
            .build()
            .map_err(|e| ProbeError::ClientSetup {
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn options(&self, url: &Url) -> Result<u16> {
        let response = self
            .client
            .request(Method::OPTIONS, url.clone())
            .send()
            .await
            .map_err(|e| ProbeError::Unreachable {
                url: url.to_string(),
                reason: describe_transport_error(&e),
            })?;
        Ok(response.status().as_u16())
    }
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    let kind = if error.is_timeout() {
        "timed out"
    } else if error.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };

    // reqwest's own message hides the OS-level cause in the source chain
    let mut detail = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    format!("{}: {}", kind, detail)
}

#[derive(Debug, Clone)]
pub struct EndpointProber<T = HttpTransport> {
    base_url: Url,
    status_id: String,
    transport: T,
}

impl EndpointProber<HttpTransport> {
    pub fn from_config(config: &ProbeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_transport(
            config.parsed_base_url()?,
            config.status_id.clone(),
            HttpTransport::new(config.timeout())?,
        ))
    }
}

impl<T: Transport> EndpointProber<T> {
    pub fn with_transport(base_url: Url, status_id: impl Into<String>, transport: T) -> Self {
        Self {
            base_url,
            status_id: status_id.into(),
            transport,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Probe a single endpoint.
    ///
    /// Probe failures are reported in the returned [`ProbeResult`]; `Err` is
    /// reserved for a probe URL that cannot be built.
    #[instrument(skip(self, spec), fields(endpoint = %spec.name))]
    pub async fn probe(&self, spec: &EndpointSpec) -> Result<ProbeResult> {
        let url = spec.url(&self.base_url, &self.status_id)?;
        debug!("Sending OPTIONS {}", url);

        let start = Instant::now();
        let outcome = self.transport.options(&url).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(status) => ProbeResult::responded(spec.clone(), url.to_string(), status, elapsed_ms),
            Err(ProbeError::Unreachable { reason, .. }) => {
                ProbeResult::unreachable(spec.clone(), url.to_string(), reason, elapsed_ms)
            }
            Err(other) => {
                let reason = other.to_string();
                ProbeResult::unreachable(spec.clone(), url.to_string(), reason, elapsed_ms)
            }
        };

        match (result.observed_status, result.passed) {
            (Some(status), true) => info!("{} answered {} in {}ms", url, status, elapsed_ms),
            _ => warn!("{}", result.diagnostic.as_deref().unwrap_or("probe failed")),
        }

        Ok(result)
    }

    /// Probe every endpoint in order and collect a report
    #[instrument(skip(self, specs), fields(base_url = %self.base_url, count = specs.len()))]
    pub async fn probe_all(&self, specs: &[EndpointSpec]) -> Result<ProbeReport> {
        let mut report = ProbeReport::new(self.base_url.as_str().trim_end_matches('/'));
        for spec in specs {
            report.push(self.probe(spec).await?);
        }
        info!(
            "Probed {} endpoints: {} passed, {} failed",
            report.results.len(),
            report.passed(),
            report.failed()
        );
        Ok(report)
    }
}
