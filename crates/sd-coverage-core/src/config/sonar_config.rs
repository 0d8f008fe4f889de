//! SonarQube provider configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use super::defaults;
use crate::errors::ConfigError;

/// Configuration for one SonarQube-backed provider instance.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`COVERAGE_SONAR_*`, `SD_API_URL`, `SD_UI_URL`)
/// 2. Config file (TOML)
/// 3. Compiled defaults
///
/// The config is validated once and then owned by a single provider; two
/// providers pointed at different hosts never share state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SonarConfig {
    /// Screwdriver API base URL, used to build the token endpoint.
    pub sd_api_url: String,
    /// Screwdriver UI base URL, substituted into the upload script.
    pub sd_ui_url: String,
    /// SonarQube base URL.
    pub sonar_host: String,
    /// SonarQube admin token. Sent as the Basic auth login with no password.
    pub admin_token: String,
    /// Enables pipeline-level scoping, PR dashboards, and Git App binding.
    pub sonar_enterprise: bool,
    /// Name of the GitHub ALM setting in SonarQube.
    pub sonar_git_app_name: String,
    /// Request timeout handed to the HTTP transport.
    pub http_timeout_secs: u64,
}

impl Default for SonarConfig {
    fn default() -> Self {
        Self {
            sd_api_url: String::new(),
            sd_ui_url: String::new(),
            sonar_host: String::new(),
            admin_token: String::new(),
            sonar_enterprise: defaults::DEFAULT_SONAR_ENTERPRISE,
            sonar_git_app_name: defaults::DEFAULT_SONAR_GIT_APP_NAME.to_string(),
            http_timeout_secs: defaults::DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl SonarConfig {
    /// Load configuration: defaults, then the optional TOML file, then the
    /// process environment. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string. Not validated.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply overrides from an environment lookup. Unparseable booleans
    /// are ignored and the previous value is kept.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(defaults::ENV_SD_API_URL) {
            self.sd_api_url = val;
        }
        if let Some(val) = lookup(defaults::ENV_SD_UI_URL) {
            self.sd_ui_url = val;
        }
        if let Some(val) = lookup(defaults::ENV_SONAR_HOST) {
            self.sonar_host = val;
        }
        if let Some(val) = lookup(defaults::ENV_SONAR_ADMIN_TOKEN) {
            self.admin_token = val;
        }
        if let Some(val) = lookup(defaults::ENV_SONAR_ENTERPRISE) {
            if let Ok(v) = val.parse::<bool>() {
                self.sonar_enterprise = v;
            }
        }
        if let Some(val) = lookup(defaults::ENV_SONAR_GIT_APP_NAME) {
            self.sonar_git_app_name = val;
        }
    }

    /// Validate the configuration values. Runs before any network activity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url("sd_api_url", &self.sd_api_url)?;
        validate_url("sd_ui_url", &self.sd_ui_url)?;
        validate_url("sonar_host", &self.sonar_host)?;

        if self.admin_token.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "admin_token".to_string(),
                message: "is required".to_string(),
            });
        }
        if self.sonar_git_app_name.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "sonar_git_app_name".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "http_timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// `sonar_host` without a trailing slash, for path concatenation.
    pub fn sonar_host_base(&self) -> &str {
        self.sonar_host.trim_end_matches('/')
    }

    /// `sd_api_url` without a trailing slash, for path concatenation.
    pub fn sd_api_base(&self) -> &str {
        self.sd_api_url.trim_end_matches('/')
    }
}

fn validate_url(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::ValidationFailed {
            field: field.to_string(),
            message: "is required".to_string(),
        });
    }
    let parsed = Url::parse(value).map_err(|e| ConfigError::ValidationFailed {
        field: field.to_string(),
        message: format!("must be a valid URI: {e}"),
    })?;
    if parsed.cannot_be_a_base() {
        return Err(ConfigError::ValidationFailed {
            field: field.to_string(),
            message: "must be an absolute URI".to_string(),
        });
    }
    Ok(())
}
