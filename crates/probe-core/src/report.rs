//! Probe results and the aggregated report

use crate::endpoint::EndpointSpec;
use crate::error::{ProbeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal state of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    UnexpectedStatus,
    Unreachable,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Pass => "PASS",
            Verdict::UnexpectedStatus => "FAIL",
            Verdict::Unreachable => "UNREACHABLE",
        };
        f.write_str(label)
    }
}

/// Outcome of probing one endpoint once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub endpoint: EndpointSpec,
    pub url: String,
    pub observed_status: Option<u16>,
    pub reachable: bool,
    pub passed: bool,
    pub verdict: Verdict,
    pub diagnostic: Option<String>,
    /// Transport failure behind an unreachable verdict
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_error: Option<String>,
    pub elapsed_ms: u64,
    pub probed_at: DateTime<Utc>,
}

impl ProbeResult {
    /// Classify a received status against the endpoint's allow-list
    pub fn responded(
        endpoint: EndpointSpec,
        url: String,
        status: u16,
        elapsed_ms: u64,
    ) -> Self {
        let passed = endpoint.allows(status);
        let diagnostic = (!passed).then(|| {
            ProbeError::UnexpectedStatus {
                endpoint: endpoint.name.clone(),
                status,
                allowed: endpoint.allowed(),
            }
            .to_string()
        });

        Self {
            endpoint,
            url,
            observed_status: Some(status),
            reachable: true,
            passed,
            verdict: if passed {
                Verdict::Pass
            } else {
                Verdict::UnexpectedStatus
            },
            diagnostic,
            transport_error: None,
            elapsed_ms,
            probed_at: Utc::now(),
        }
    }

    /// No response was received
    pub fn unreachable(
        endpoint: EndpointSpec,
        url: String,
        reason: String,
        elapsed_ms: u64,
    ) -> Self {
        let diagnostic = ProbeError::Unreachable {
            url: url.clone(),
            reason: reason.clone(),
        }
        .to_string();

        Self {
            endpoint,
            url,
            observed_status: None,
            reachable: false,
            passed: false,
            verdict: Verdict::Unreachable,
            diagnostic: Some(diagnostic),
            transport_error: Some(reason),
            elapsed_ms,
            probed_at: Utc::now(),
        }
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// The observed status, or the failure as an error
    pub fn into_result(self) -> Result<u16> {
        match (self.observed_status, self.passed) {
            (Some(status), true) => Ok(status),
            (Some(status), false) => Err(ProbeError::UnexpectedStatus {
                allowed: self.endpoint.allowed(),
                endpoint: self.endpoint.name,
                status,
            }),
            (None, _) => Err(ProbeError::Unreachable {
                url: self.url,
                reason: self
                    .transport_error
                    .unwrap_or_else(|| "no response received".to_string()),
            }),
        }
    }
}

/// Results of probing a list of endpoints against one server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    pub base_url: String,
    pub started_at: DateTime<Utc>,
    pub results: Vec<ProbeResult>,
}

impl ProbeReport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            started_at: Utc::now(),
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, result: ProbeResult) {
        self.results.push(result);
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
