use serde::{Deserialize, Serialize};

/// Rendered for any metric SonarQube could not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Coverage and test results for one build window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageMetrics {
    /// Percentage string as reported by SonarQube, or `N/A`.
    pub coverage: String,
    /// `<pass>/<total>`, or `N/A`.
    pub tests: String,
}

impl CoverageMetrics {
    pub fn not_available() -> Self {
        Self {
            coverage: NOT_AVAILABLE.to_string(),
            tests: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Environment handed to the build so its upload step can find SonarQube.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVars {
    #[serde(rename = "SD_SONAR_AUTH_URL")]
    pub sd_sonar_auth_url: String,
    #[serde(rename = "SD_SONAR_HOST")]
    pub sd_sonar_host: String,
    #[serde(rename = "SD_SONAR_ENTERPRISE")]
    pub sd_sonar_enterprise: bool,
    #[serde(rename = "SD_SONAR_PROJECT_KEY")]
    pub sd_sonar_project_key: String,
    #[serde(rename = "SD_SONAR_PROJECT_NAME")]
    pub sd_sonar_project_name: String,
}

impl EnvVars {
    /// `(name, value)` pairs in a stable order, for exporting to a shell.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("SD_SONAR_AUTH_URL", self.sd_sonar_auth_url.clone()),
            ("SD_SONAR_HOST", self.sd_sonar_host.clone()),
            ("SD_SONAR_ENTERPRISE", self.sd_sonar_enterprise.to_string()),
            ("SD_SONAR_PROJECT_KEY", self.sd_sonar_project_key.clone()),
            ("SD_SONAR_PROJECT_NAME", self.sd_sonar_project_name.clone()),
        ]
    }
}

/// Result of a provider `get_info` call. Metrics are present only once the
/// build has finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageInfo {
    pub env_vars: EnvVars,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tests: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
}
