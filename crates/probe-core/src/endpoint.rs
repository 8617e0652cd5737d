//! Endpoint definitions and the fixed endpoint table

use crate::endpoints;
use crate::error::{ProbeError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A named endpoint and the status codes accepted from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSpec {
    pub name: String,
    pub path: String,
    pub allowed_statuses: BTreeSet<u16>,
}

impl EndpointSpec {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        allowed_statuses: impl IntoIterator<Item = u16>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            allowed_statuses: allowed_statuses.into_iter().collect(),
        }
    }

    /// Whether `status` is on this endpoint's allow-list
    pub fn allows(&self, status: u16) -> bool {
        self.allowed_statuses.contains(&status)
    }

    pub fn allowed(&self) -> Vec<u16> {
        self.allowed_statuses.iter().copied().collect()
    }

    /// Absolute probe URL for this endpoint.
    ///
    /// The path is appended to the base as text, so a base URL carrying a
    /// path prefix (`http://host/prefix`) keeps it. The status id fills the
    /// `{id}` segment percent-encoded, so it can never leave that segment.
    pub fn url(&self, base: &Url, status_id: &str) -> Result<Url> {
        ensure_plain_base(base)?;
        let prefix = base.as_str().trim_end_matches('/');

        let Some((head, tail)) = self.path.split_once(endpoints::ID_PLACEHOLDER) else {
            return self.parse_joined(format!("{}{}", prefix, self.path));
        };
        if !head.ends_with('/') || !(tail.is_empty() || tail.starts_with('/')) {
            return Err(ProbeError::InvalidEndpoint {
                input: self.path.clone(),
                reason: format!("{} must fill a whole path segment", endpoints::ID_PLACEHOLDER),
            });
        }
        if matches!(status_id, "" | "." | "..") {
            return Err(ProbeError::InvalidConfig {
                key: "status_id".to_string(),
                reason: format!("'{}' is not a usable path segment", status_id),
            });
        }

        let mut url = self.parse_joined(format!("{}{}", prefix, head))?;
        url.path_segments_mut()
            .map_err(|_| ProbeError::InvalidBaseUrl {
                url: base.to_string(),
                reason: "base URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .push(status_id);

        if tail.is_empty() {
            Ok(url)
        } else {
            self.parse_joined(format!("{}{}", url.as_str(), tail))
        }
    }

    fn parse_joined(&self, joined: String) -> Result<Url> {
        Url::parse(&joined).map_err(|e| ProbeError::InvalidEndpoint {
            input: joined.clone(),
            reason: e.to_string(),
        })
    }
}

/// Paths are appended to the base as text, so a query or fragment on the
/// base would swallow them.
pub(crate) fn ensure_plain_base(base: &Url) -> Result<()> {
    let part = if base.query().is_some() {
        "query"
    } else if base.fragment().is_some() {
        "fragment"
    } else {
        return Ok(());
    };
    Err(ProbeError::InvalidBaseUrl {
        url: base.to_string(),
        reason: format!("base URL must not carry a {}", part),
    })
}

impl fmt::Display for EndpointSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<String> = self
            .allowed_statuses
            .iter()
            .map(|code| code.to_string())
            .collect();
        write!(f, "{}={}:{}", self.name, self.path, codes.join(","))
    }
}

/// Parses `name=/path:200,404`
impl FromStr for EndpointSpec {
    type Err = ProbeError;

    fn from_str(input: &str) -> Result<Self> {
        let invalid = |reason: &str| ProbeError::InvalidEndpoint {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (name, rest) = input
            .split_once('=')
            .ok_or_else(|| invalid("expected name=/path:codes"))?;
        let name = name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(invalid("name must be a non-empty word"));
        }

        let (path, codes) = rest
            .rsplit_once(':')
            .ok_or_else(|| invalid("missing ':' before status codes"))?;
        let path = path.trim();
        if !path.starts_with('/') {
            return Err(invalid("path must start with '/'"));
        }

        let mut allowed = BTreeSet::new();
        for code in codes.split(',') {
            let code: u16 = code
                .trim()
                .parse()
                .map_err(|_| invalid("status codes must be integers"))?;
            if !(100..=599).contains(&code) {
                return Err(invalid("status codes must be within 100-599"));
            }
            allowed.insert(code);
        }

        Ok(Self {
            name: name.to_string(),
            path: path.to_string(),
            allowed_statuses: allowed,
        })
    }
}

/// The endpoint table of the service under test
pub fn default_endpoints() -> Vec<EndpointSpec> {
    vec![
        EndpointSpec::new("convert", endpoints::CONVERT, [200, 400, 401, 405]),
        EndpointSpec::new("status", endpoints::STATUS, [200, 400, 401, 404]),
        EndpointSpec::new("upload", endpoints::UPLOAD, [200, 400, 401, 405]),
    ]
}

/// Look up an endpoint by name
pub fn find_endpoint<'a>(specs: &'a [EndpointSpec], name: &str) -> Result<&'a EndpointSpec> {
    specs
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| ProbeError::UnknownEndpoint {
            name: name.to_string(),
        })
}

/// Append `extra` to `base`; every name must stay unique
pub fn merge_endpoints(
    mut base: Vec<EndpointSpec>,
    extra: Vec<EndpointSpec>,
) -> Result<Vec<EndpointSpec>> {
    for spec in extra {
        if base.iter().any(|existing| existing.name == spec.name) {
            return Err(ProbeError::DuplicateEndpoint { name: spec.name });
        }
        base.push(spec);
    }
    Ok(base)
}
