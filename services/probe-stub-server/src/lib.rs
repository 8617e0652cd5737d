//! # Probe Stub Server
//!
//! Placeholder for the API under contract: every endpoint exists and answers
//! `OPTIONS`, but none of them converts, stores, tracks or authenticates
//! anything yet.

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use probe_core::endpoints;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// `HOST` and `PORT` override the defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Ok(host) = std::env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT '{}': {}", port, e))?;
        }
        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn app() -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(health_check))
        .route(
            endpoints::UPLOAD,
            post(not_implemented).options(|| async { preflight("POST, OPTIONS") }),
        )
        .route(
            endpoints::CONVERT,
            post(not_implemented).options(|| async { preflight("POST, OPTIONS") }),
        )
        .route(
            endpoints::STATUS,
            get(job_status).options(|| async { preflight("GET, OPTIONS") }),
        )
}

fn preflight(allow: &'static str) -> impl IntoResponse {
    (StatusCode::OK, [(header::ALLOW, allow)])
}

#[instrument]
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "probe-stub-server",
        "version": probe_core::VERSION
    }))
}

#[instrument]
async fn not_implemented() -> (StatusCode, Json<Value>) {
    info!("Stub endpoint called");
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(json!({
            "error": "not implemented"
        })),
    )
}

#[instrument]
async fn job_status(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    // No jobs are ever tracked
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "job not found",
            "job_id": id
        })),
    )
}
