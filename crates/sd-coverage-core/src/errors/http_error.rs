//! Transport-level failures reported by the remote API.

use std::sync::LazyLock;

use regex::Regex;

/// SonarQube's wording for a project that has never received an analysis.
static COMPONENT_NOT_FOUND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Component key '.*' not found").unwrap());

/// A non-2xx response (or a connection failure, where `status` is `None`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HttpError {
    pub status: Option<u16>,
    pub message: String,
}

impl HttpError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// A failure that never produced an HTTP status (DNS, TLS, timeout).
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// SonarQube answers a duplicate create with 400 and an
    /// "... already exists" message. It carries no structured error code.
    pub fn is_already_exists(&self) -> bool {
        self.status == Some(400) && self.message.contains("already exists")
    }

    /// 404 for a project that has never received an analysis.
    pub fn is_component_not_found(&self) -> bool {
        self.status == Some(404) && COMPONENT_NOT_FOUND_RE.is_match(&self.message)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}
