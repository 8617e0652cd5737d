//! Error types for the prober

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProbeError>;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Server not running or endpoint unreachable: {url} ({reason})")]
    Unreachable { url: String, reason: String },

    #[error("Unexpected status: {status} from {endpoint} (allowed: {allowed:?})")]
    UnexpectedStatus {
        endpoint: String,
        status: u16,
        allowed: Vec<u16>,
    },

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid endpoint definition '{input}': {reason}")]
    InvalidEndpoint { input: String, reason: String },

    #[error("Unknown endpoint: {name}")]
    UnknownEndpoint { name: String },

    #[error("Duplicate endpoint: {name}")]
    DuplicateEndpoint { name: String },

    #[error("Invalid configuration for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    #[error("HTTP client setup failed: {reason}")]
    ClientSetup { reason: String },

    #[error("Serialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },
}

impl ProbeError {
    /// True for failures where no response was received at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ProbeError::Unreachable { .. })
    }
}
