//! HTTP client with Basic auth, timeout, and gzip compression.

use std::time::Duration;

use sd_coverage_core::errors::HttpError;
use sd_coverage_core::SonarConfig;

use super::{ISonarTransport, Method, SonarRequest};
use crate::api::SonarErrorBody;

/// Configuration for the HTTP transport layer.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL of the SonarQube server.
    pub base_url: String,
    /// Admin token, sent as the Basic auth login with an empty password.
    pub admin_token: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl From<&SonarConfig> for HttpClientConfig {
    fn from(config: &SonarConfig) -> Self {
        Self {
            base_url: config.sonar_host_base().to_string(),
            admin_token: config.admin_token.clone(),
            timeout: Duration::from_secs(config.http_timeout_secs),
        }
    }
}

/// Blocking SonarQube client. Must not be driven from inside an async
/// runtime's worker thread.
#[derive(Debug)]
pub struct HttpClient {
    config: HttpClientConfig,
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .map_err(|e| HttpError::network(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

impl ISonarTransport for HttpClient {
    fn send(&self, request: &SonarRequest) -> Result<serde_json::Value, HttpError> {
        let url = format!("{}{}", self.config.base_url, request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        tracing::debug!(method = %method, path = request.path, "sonar: request");

        let resp = self
            .client
            .request(method, &url)
            .query(&request.query)
            .basic_auth(&self.config.admin_token, None::<&str>)
            .send()
            .map_err(|e| HttpError::network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| HttpError::network(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(HttpError::new(status.as_u16(), error_message(&body, status)));
        }
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|e| HttpError::new(status.as_u16(), format!("deserialization failed: {e}")))
    }
}

/// SonarQube's own error text when the body carries one, else the raw body,
/// else the status reason.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(parsed) = serde_json::from_str::<SonarErrorBody>(body) {
        if let Some(msg) = parsed.message() {
            return msg;
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Unknown status")
        .to_string()
}
