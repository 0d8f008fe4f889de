//! Transport layer: the request seam the provider talks through, and the
//! reqwest-backed client used in production.

pub mod http_client;

pub use http_client::{HttpClient, HttpClientConfig};

use sd_coverage_core::errors::HttpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One SonarQube Web API call. Parameters always travel in the query
/// string, as the Web API expects for both GET and POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SonarRequest {
    pub method: Method,
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
}

impl SonarRequest {
    pub fn get(path: &'static str) -> Self {
        Self {
            method: Method::Get,
            path,
            query: Vec::new(),
        }
    }

    pub fn post(path: &'static str) -> Self {
        Self {
            method: Method::Post,
            path,
            query: Vec::new(),
        }
    }

    pub fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Sends authenticated requests to one SonarQube host.
///
/// Implementations return the decoded JSON body on 2xx (`Value::Null` for an
/// empty body) and an [`HttpError`] carrying the status and SonarQube's
/// message otherwise. Timeouts are the implementation's concern.
pub trait ISonarTransport: Send + Sync {
    fn send(&self, request: &SonarRequest) -> Result<serde_json::Value, HttpError>;
}
